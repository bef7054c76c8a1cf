use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpritePackerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid image dimensions for '{key}': {width}x{height}")]
    InvalidDimensions { key: String, width: u32, height: u32 },
    #[error("Invalid container size: {0}")]
    InvalidContainerSize(u32),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(
        "Image '{key}' ({width}x{height}) cannot fit a {container_size}x{container_size} container with its padding"
    )]
    ImageTooLarge {
        key: String,
        width: u32,
        height: u32,
        container_size: u32,
    },
    #[error("Encoding error: {0}")]
    Encode(String),
    #[error("Decoding error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, SpritePackerError>;
