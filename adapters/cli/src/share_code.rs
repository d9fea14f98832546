#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use tilefall_core::GridPos;
use tilefall_world::maps::MapData;

const SNAPSHOT_DOMAIN: &str = "tilefall";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const SNAPSHOT_HEADER: &str = "tilefall:v1";
/// Delimiter used to separate the prefix, level dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of one level suitable for clipboard transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LevelSnapshot {
    /// Number of active columns declared by the level.
    pub width: u8,
    /// Number of active rows declared by the level.
    pub height: u8,
    /// Cell the player occupies when the level begins.
    pub player_spawn: GridPos,
    /// Packed tile stream in row-major order.
    pub tile_stream: Vec<u8>,
}

impl LevelSnapshot {
    /// Captures a snapshot of an existing level descriptor.
    #[must_use]
    pub(crate) fn from_map(data: MapData<'_>) -> Self {
        Self {
            width: data.width(),
            height: data.height(),
            player_spawn: data.player_spawn(),
            tile_stream: data.tile_stream().to_vec(),
        }
    }

    /// Rebuilds the level blob the snapshot was captured from.
    #[must_use]
    pub(crate) fn level_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![
            self.width,
            self.height,
            self.player_spawn.x(),
            self.player_spawn.y(),
        ];
        bytes.extend_from_slice(&self.tile_stream);
        bytes
    }

    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableSnapshot {
            player_spawn: self.player_spawn,
            tile_stream: self.tile_stream.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("level snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SNAPSHOT_HEADER}:{}x{}:{encoded}", self.width, self.height)
    }

    /// Decodes a snapshot from the provided string representation.
    ///
    /// A decoded snapshot always satisfies the level header contract, so it
    /// can be handed to [`MapData`] without further checks.
    pub(crate) fn decode(value: &str) -> Result<Self, ShareCodeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ShareCodeError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(ShareCodeError::MissingPrefix)?;
        let version = parts.next().ok_or(ShareCodeError::MissingVersion)?;
        let dimensions = parts.next().ok_or(ShareCodeError::MissingDimensions)?;
        let payload = parts.next().ok_or(ShareCodeError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(ShareCodeError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(ShareCodeError::UnsupportedVersion(version.to_owned()));
        }

        let (width, height) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(ShareCodeError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(ShareCodeError::InvalidPayload)?;

        let snapshot = Self {
            width,
            height,
            player_spawn: decoded.player_spawn,
            tile_stream: decoded.tile_stream,
        };
        let level_bytes = snapshot.level_bytes();
        if !MapData::new(&level_bytes).is_well_formed() {
            return Err(ShareCodeError::MalformedLevel);
        }

        Ok(snapshot)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SerializableSnapshot {
    player_spawn: GridPos,
    tile_stream: Vec<u8>,
}

/// Errors that can occur while decoding share codes.
#[derive(Debug)]
pub(crate) enum ShareCodeError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the share code.
    MissingPrefix,
    /// The share code did not contain a version segment.
    MissingVersion,
    /// The share code did not include level dimensions.
    MissingDimensions,
    /// The share code did not include the payload segment.
    MissingPayload,
    /// The share code used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The share code used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The level dimensions could not be parsed from the share code.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// The decoded level violates the arena contract.
    MalformedLevel,
}

impl fmt::Display for ShareCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "share code was empty"),
            Self::MissingPrefix => write!(f, "share code is missing the prefix"),
            Self::MissingVersion => write!(f, "share code is missing the version"),
            Self::MissingDimensions => write!(f, "share code is missing the level dimensions"),
            Self::MissingPayload => write!(f, "share code is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "share prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "share version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse level dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode share payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse share payload: {error}")
            }
            Self::MalformedLevel => {
                write!(f, "decoded level does not fit the board arena")
            }
        }
    }
}

impl Error for ShareCodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u8, u8), ShareCodeError> {
    let (width, height) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| ShareCodeError::InvalidDimensions(dimensions.to_owned()))?;

    let width = width
        .trim()
        .parse::<u8>()
        .map_err(|_| ShareCodeError::InvalidDimensions(dimensions.to_owned()))?;
    let height = height
        .trim()
        .parse::<u8>()
        .map_err(|_| ShareCodeError::InvalidDimensions(dimensions.to_owned()))?;

    if width == 0 || height == 0 {
        return Err(ShareCodeError::InvalidDimensions(dimensions.to_owned()));
    }

    Ok((width, height))
}
