use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed writing image data: {0}")]
    Write(#[from] io::Error),
    #[error("line {line}: {message}")]
    ObjParse { line: usize, message: String },
    #[error("face {face} references vertex {index}, but only {vertex_count} vertices exist")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
    #[error("framebuffer of {width}x{height} cannot be written")]
    EmptyImage { width: usize, height: usize },
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
