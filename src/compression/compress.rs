use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};

/// LZ4 block with the original size recorded for decompression
#[derive(Serialize, Deserialize)]
pub struct CompressedBlock {
    pub data: Vec<u8>,
    pub original_size: usize,
}

impl CompressedBlock {
    pub fn compress(data: &[u8]) -> Self {
        CompressedBlock {
            data: lz4_flex::compress(data),
            original_size: data.len(),
        }
    }

    pub fn decompress(&self) -> Result<Vec<u8>> {
        let output = lz4_flex::decompress(&self.data, self.original_size)
            .map_err(|e| Error::new(ErrorKind::Parse, e.to_string()))?;
        if output.len() != self.original_size {
            return Err(Error::new(
                ErrorKind::Parse,
                format!(
                    "decompressed {} bytes, block records {}",
                    output.len(),
                    self.original_size
                ),
            ));
        }
        Ok(output)
    }
}
