#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_chase_core::{Grid, ParameterError};
use serde::{Deserialize, Serialize};

const SNAPSHOT_DOMAIN: &str = "maze";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Single-line snapshot of a generated grid suitable for clipboard transfer.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GridSnapshot {
    grid: Grid,
}

impl GridSnapshot {
    /// Captures the provided grid.
    #[must_use]
    pub(crate) fn new(grid: Grid) -> Self {
        Self { grid }
    }

    /// Consumes the snapshot, yielding the captured grid.
    #[must_use]
    pub(crate) fn into_grid(self) -> Grid {
        self.grid
    }

    /// Encodes the snapshot into a single-line string.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableSnapshot {
            walls: pack_cells(self.grid.cells()),
        };
        let json = serde_json::to_vec(&payload).expect("grid snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.grid.columns(),
            self.grid.rows()
        )
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, SnapshotError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SnapshotError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(SnapshotError::MissingPrefix)?;
        let version = parts.next().ok_or(SnapshotError::MissingVersion)?;
        let dimensions = parts.next().ok_or(SnapshotError::MissingDimensions)?;
        let payload = parts.next().ok_or(SnapshotError::MissingPayload)?;
        if let Some(extra) = parts.next() {
            return Err(SnapshotError::TrailingSegment(extra.to_owned()));
        }

        if domain != SNAPSHOT_DOMAIN {
            return Err(SnapshotError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(SnapshotError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(SnapshotError::InvalidPayload)?;

        let count = columns as usize * rows as usize;
        let cells = unpack_cells(&decoded.walls, count)?;
        let grid = Grid::from_cells(columns, rows, cells).map_err(SnapshotError::InvalidGrid)?;

        Ok(Self { grid })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    walls: Vec<u8>,
}

/// Packs wall flags eight to a byte, least significant bit first.
fn pack_cells(cells: &[bool]) -> Vec<u8> {
    cells
        .chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (bit, wall)| byte | (u8::from(*wall) << bit))
        })
        .collect()
}

fn unpack_cells(packed: &[u8], count: usize) -> Result<Vec<bool>, SnapshotError> {
    let expected = count.div_ceil(8);
    if packed.len() != expected {
        return Err(SnapshotError::TruncatedPayload {
            expected,
            found: packed.len(),
        });
    }

    Ok((0..count)
        .map(|index| packed[index / 8] & (1 << (index % 8)) != 0)
        .collect())
}

/// Errors that can occur while decoding grid snapshot strings.
#[derive(Debug)]
pub(crate) enum SnapshotError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    MissingPayload,
    /// The encoded snapshot carried a segment after the payload.
    TrailingSegment(String),
    /// The encoded snapshot used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded snapshot.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// The packed cells do not cover the declared dimensions.
    TruncatedPayload {
        /// Number of bytes the dimensions require.
        expected: usize,
        /// Number of bytes present in the payload.
        found: usize,
    },
    /// The decoded cells could not form a grid.
    InvalidGrid(ParameterError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "snapshot string was empty"),
            Self::MissingPrefix => write!(f, "snapshot string is missing the prefix"),
            Self::MissingVersion => write!(f, "snapshot string is missing the version"),
            Self::MissingDimensions => write!(f, "snapshot string is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "snapshot string is missing the payload"),
            Self::TrailingSegment(segment) => {
                write!(f, "unexpected segment '{segment}' after the snapshot payload")
            }
            Self::InvalidPrefix(prefix) => write!(f, "snapshot prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "snapshot version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode snapshot payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse snapshot payload: {error}")
            }
            Self::TruncatedPayload { expected, found } => {
                write!(
                    f,
                    "snapshot payload holds {found} bytes of cells, expected {expected}"
                )
            }
            Self::InvalidGrid(error) => write!(f, "snapshot does not describe a grid: {error}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            Self::InvalidGrid(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), SnapshotError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| SnapshotError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| SnapshotError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| SnapshotError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(SnapshotError::InvalidDimensions(dimensions.to_owned()));
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{CellCoord, GrowthParameters};
    use maze_chase_system_generation::generate;

    #[test]
    fn round_trip_enclosed_grid() {
        let snapshot = GridSnapshot::new(Grid::enclosed(7, 5));

        let encoded = snapshot.encode();
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:7x5:")));

        let decoded = GridSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn round_trip_generated_grid() {
        let params = GrowthParameters::new(30, 30, 0.75, 0.75).expect("valid parameters");
        let grid = generate(&params, 12);
        let encoded = GridSnapshot::new(grid.clone()).encode();

        let decoded = GridSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(decoded.into_grid(), grid);
    }

    #[test]
    fn packing_is_least_significant_bit_first() {
        let mut grid = Grid::open(3, 3);
        grid.set_wall(CellCoord::new(0, 0), true);
        grid.set_wall(CellCoord::new(2, 2), true);

        assert_eq!(pack_cells(grid.cells()), vec![0b0000_0001, 0b0000_0001]);
    }

    #[test]
    fn rejects_foreign_prefix() {
        let error = GridSnapshot::decode("grid:v1:3x3:AA").expect_err("prefix rejected");
        assert!(matches!(error, SnapshotError::InvalidPrefix(prefix) if prefix == "grid"));
    }

    #[test]
    fn rejects_unknown_version() {
        let error = GridSnapshot::decode("maze:v9:3x3:AA").expect_err("version rejected");
        assert!(matches!(error, SnapshotError::UnsupportedVersion(_)));
    }

    #[test]
    fn rejects_zero_dimensions() {
        let error = GridSnapshot::decode("maze:v1:0x3:AA").expect_err("dimensions rejected");
        assert!(matches!(error, SnapshotError::InvalidDimensions(_)));
    }

    #[test]
    fn rejects_missing_payload() {
        let error = GridSnapshot::decode("maze:v1:3x3").expect_err("payload required");
        assert!(matches!(error, SnapshotError::MissingPayload));
    }

    #[test]
    fn rejects_segments_after_the_payload() {
        let encoded = GridSnapshot::new(Grid::enclosed(3, 3)).encode();
        let error = GridSnapshot::decode(&format!("{encoded}:junk")).expect_err("extra rejected");
        assert!(matches!(error, SnapshotError::TrailingSegment(segment) if segment == "junk"));
    }

    #[test]
    fn rejects_payload_that_does_not_cover_the_grid() {
        let encoded = GridSnapshot::new(Grid::enclosed(3, 3)).encode();
        let payload = encoded.rsplit(':').next().expect("payload segment");
        let tampered = format!("{SNAPSHOT_HEADER}:9x9:{payload}");

        let error = GridSnapshot::decode(&tampered).expect_err("size mismatch rejected");
        assert!(matches!(
            error,
            SnapshotError::TruncatedPayload {
                expected: 11,
                found: 2
            }
        ));
    }
}
