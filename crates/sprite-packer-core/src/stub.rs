//! Binary sprite stubs.
//!
//! A stub tells the runtime loader where a sprite lives: the asset name of its container
//! texture followed by the interior rectangle. Layout:
//!
//! | field   | encoding                                                   |
//! |---------|------------------------------------------------------------|
//! | texture | byte length as 7-bit variable-length integer, UTF-8 bytes |
//! | x       | `i32` little-endian                                        |
//! | y       | `i32` little-endian                                        |
//! | width   | `i32` little-endian                                        |
//! | height  | `i32` little-endian                                        |

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpritePackerError};
use crate::model::{Placement, Rect};

/// Serialized placement record for one sprite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteStub {
    /// Asset name of the container texture.
    pub texture: String,
    /// Interior rectangle inside the texture.
    pub rect: Rect,
}

impl SpriteStub {
    pub fn new(texture: impl Into<String>, rect: Rect) -> Self {
        Self {
            texture: texture.into(),
            rect,
        }
    }

    pub fn from_placement<K>(placement: &Placement<K>) -> Self {
        Self::new(placement.container.clone(), placement.frame)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.texture.len() + 21);
        write_stub(&mut buf, self)?;
        Ok(buf)
    }

    /// Decodes a stub that spans the whole of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = bytes;
        let stub = read_stub(&mut cursor)?;
        if !cursor.is_empty() {
            return Err(SpritePackerError::Decode(format!(
                "{} trailing bytes after sprite stub",
                cursor.len()
            )));
        }
        Ok(stub)
    }
}

pub fn write_stub<W: Write>(w: &mut W, stub: &SpriteStub) -> Result<()> {
    let len = u32::try_from(stub.texture.len()).map_err(|_| {
        SpritePackerError::Encode(format!(
            "texture name is {} bytes long",
            stub.texture.len()
        ))
    })?;
    write_7bit(w, len)?;
    w.write_all(stub.texture.as_bytes())?;
    for v in [stub.rect.x, stub.rect.y, stub.rect.w, stub.rect.h] {
        let v = i32::try_from(v).map_err(|_| {
            SpritePackerError::Encode(format!("rectangle component {} exceeds i32", v))
        })?;
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

pub fn read_stub<R: Read>(r: &mut R) -> Result<SpriteStub> {
    let len = read_7bit(r)? as usize;
    let mut raw = Vec::with_capacity(len.min(4096));
    r.by_ref().take(len as u64).read_to_end(&mut raw)?;
    if raw.len() != len {
        return Err(SpritePackerError::Decode(format!(
            "texture name truncated: expected {} bytes, got {}",
            len,
            raw.len()
        )));
    }
    let texture = String::from_utf8(raw)
        .map_err(|e| SpritePackerError::Decode(format!("texture name is not UTF-8: {}", e)))?;
    let x = read_component(r, "x")?;
    let y = read_component(r, "y")?;
    let w = read_component(r, "width")?;
    let h = read_component(r, "height")?;
    Ok(SpriteStub {
        texture,
        rect: Rect::new(x, y, w, h),
    })
}

fn read_component<R: Read>(r: &mut R, name: &str) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    let v = i32::from_le_bytes(buf);
    u32::try_from(v)
        .map_err(|_| SpritePackerError::Decode(format!("negative rectangle {}: {}", name, v)))
}

fn write_7bit<W: Write>(w: &mut W, mut v: u32) -> Result<()> {
    while v >= 0x80 {
        w.write_all(&[(v as u8) | 0x80])?;
        v >>= 7;
    }
    w.write_all(&[v as u8])?;
    Ok(())
}

fn read_7bit<R: Read>(r: &mut R) -> Result<u32> {
    let mut result = 0u32;
    let mut shift = 0u32;
    loop {
        let mut byte = [0u8; 1];
        r.read_exact(&mut byte)?;
        let b = byte[0];
        // fifth byte may only carry the top four bits
        if shift == 28 && b > 0x0f {
            return Err(SpritePackerError::Decode(
                "string length prefix is malformed".into(),
            ));
        }
        result |= ((b & 0x7f) as u32) << shift;
        if b & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}
