//! Section file format.
//!
//! ```text
//! [u8 version][gzip( bincode(Vec<Position>) volume, bincode(Vec<Position>) edges )]
//! ```
//!
//! Each layer is length-prefixed by bincode. The version byte is read and
//! reported but not used to select a decoder; there is only one layout.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use thiserror::Error;

use crate::coord::SectionCoord;
use crate::section::{Position, Section};

pub const FORMAT_VERSION: u8 = 1;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("bincode: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("missing format version byte")]
    MissingVersion,
    #[error("{layer} layer has {found} cells, expected {expected}")]
    Length {
        layer: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Decoded section plus the version byte found in the file.
#[derive(Debug)]
pub struct Decoded {
    pub version: u8,
    pub section: Section,
}

pub fn encode<W: Write>(mut w: W, section: &Section) -> Result<(), CodecError> {
    w.write_all(&[FORMAT_VERSION])?;
    let mut gz = GzEncoder::new(w, Compression::default());
    bincode::serialize_into(&mut gz, section.positions())?;
    bincode::serialize_into(&mut gz, section.edges())?;
    let mut inner = gz.finish()?;
    inner.flush()?;
    Ok(())
}

pub fn decode<R: Read>(mut r: R, coord: SectionCoord) -> Result<Decoded, CodecError> {
    let mut version = [0u8; 1];
    r.read_exact(&mut version).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => CodecError::MissingVersion,
        _ => CodecError::Io(e),
    })?;
    let mut gz = GzDecoder::new(r);
    let positions: Vec<Position> = bincode::deserialize_from(&mut gz)?;
    check_len("volume", Section::VOLUME, positions.len())?;
    let edges: Vec<Position> = bincode::deserialize_from(&mut gz)?;
    check_len("edge", Section::AREA, edges.len())?;
    let section = Section::from_layers(coord, positions, edges).ok_or(CodecError::Length {
        layer: "section",
        expected: Section::VOLUME,
        found: 0,
    })?;
    Ok(Decoded {
        version: version[0],
        section,
    })
}

fn check_len(layer: &'static str, expected: usize, found: usize) -> Result<(), CodecError> {
    if expected == found {
        Ok(())
    } else {
        Err(CodecError::Length {
            layer,
            expected,
            found,
        })
    }
}
