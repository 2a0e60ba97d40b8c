use crc32fast::Hasher;
use std::fs;
use std::io::Write;
use std::path::Path;
use crate::compression::compress::CompressedBlock;
use crate::compression::delta::DeltaEncoder;
use crate::core::error::{Error, ErrorKind, Result};
use crate::index::posting::PostingStore;

const MAGIC: &[u8; 4] = b"NIDX";
const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = 9; // magic + version + checksum

// [ MAGIC | VERSION | CRC32(payload) ] <- byte 0
// [ payload: bincode(CompressedBlock(bincode(delta-encoded store))) ]

/// Write a child/global index file. Position lists are delta-encoded on
/// the wire; the in-memory store is left untouched.
pub fn write_index_file(path: &Path, store: &PostingStore) -> Result<()> {
    let mut encoded = store.clone();
    DeltaEncoder::encode_index(&mut encoded.index);

    let block = CompressedBlock::compress(&bincode::serialize(&encoded)?);
    let payload = bincode::serialize(&block)?;

    let mut hasher = Hasher::new();
    hasher.update(&payload);
    let checksum = hasher.finalize();

    let mut file = fs::File::create(path)?;
    file.write_all(MAGIC)?;
    file.write_all(&[FORMAT_VERSION])?;
    file.write_all(&checksum.to_le_bytes())?;
    file.write_all(&payload)?;
    file.sync_all()?;

    Ok(())
}

/// Strict inverse of `write_index_file`: any mismatch is fatal for the file.
pub fn read_index_file(path: &Path) -> Result<PostingStore> {
    let data = fs::read(path)?;

    if data.len() < HEADER_LEN || &data[0..4] != MAGIC {
        return Err(Error::new(
            ErrorKind::Parse,
            format!("{} is not an index file", path.display()),
        ));
    }
    if data[4] != FORMAT_VERSION {
        return Err(Error::new(
            ErrorKind::Parse,
            format!("unsupported index format version {}", data[4]),
        ));
    }

    let recorded = u32::from_le_bytes([data[5], data[6], data[7], data[8]]);
    let payload = &data[HEADER_LEN..];

    let mut hasher = Hasher::new();
    hasher.update(payload);
    if hasher.finalize() != recorded {
        return Err(Error::new(
            ErrorKind::Parse,
            format!("checksum mismatch in {}", path.display()),
        ));
    }

    let block: CompressedBlock = bincode::deserialize(payload)?;
    let mut store: PostingStore = bincode::deserialize(&block.decompress()?)?;
    DeltaEncoder::decode_index(&mut store.index);

    Ok(store)
}

/// Human-inspectable sorted dump:
/// ```text
/// <term> <df>
/// \t<doc_id>: p1,p2,...,pn
/// ```
/// Terms lexicographic, doc_ids numeric, positions in natural order.
pub fn write_text_index<W: Write>(writer: &mut W, store: &PostingStore) -> Result<()> {
    for (term, postings) in store.iter_sorted() {
        writeln!(writer, "{} {}", term, postings.len())?;
        for (doc_id, positions) in postings {
            let joined = positions
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(",");
            writeln!(writer, "\t{}: {}", doc_id, joined)?;
        }
    }
    Ok(())
}
