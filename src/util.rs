use anyhow::{Context, Result};
use memmap2::Mmap;
use std::path::Path;

/// Memory-map a file for read-only access.
///
/// # Safety
/// The mapping is read-only. Callers must not concurrently truncate or replace
/// the underlying file while the `Mmap` is live.
pub fn mmap_file(path: &Path) -> Result<Mmap> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    // SAFETY: We only read from this mapping; no concurrent modification of these files.
    unsafe {
        Mmap::map(&file)
            .with_context(|| format!("Failed to memory-map file: {}", path.display()))
    }
}

/// Load a whole document into an owned buffer that can be normalized in place.
pub fn read_document(path: &Path) -> Result<Vec<u8>> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
    // Zero-length files cannot be mapped on every platform.
    if meta.len() == 0 {
        return Ok(Vec::new());
    }
    let mmap = mmap_file(path)?;
    Ok(mmap.to_vec())
}

/// Whitespace as the C locale's `isspace` sees it (includes vertical tab).
#[inline]
fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Normalize a document in one pass, in place.
///
/// Lowercases ASCII letters, maps every whitespace byte to a space and
/// collapses runs of them into one. Leading whitespace is dropped and a
/// trailing space is trimmed. Returns the new length.
pub fn normalize(buf: &mut Vec<u8>) -> usize {
    let mut len = 0;
    for i in 0..buf.len() {
        let byte = buf[i];
        if is_space(byte) {
            if len == 0 || buf[len - 1] == b' ' {
                continue;
            }
            buf[len] = b' ';
        } else {
            buf[len] = byte.to_ascii_lowercase();
        }
        len += 1;
    }
    if len > 0 && buf[len - 1] == b' ' {
        len -= 1;
    }
    buf.truncate(len);
    len
}
