//! Chunk-level framing: `[tag][u32-LE length][payload]`.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// 4-byte ASCII chunk tag.
pub type Tag = [u8; 4];

pub const TAG_PROJ: Tag = *b"PROJ";
pub const TAG_NAME: Tag = *b"NAME";
pub const TAG_RESO: Tag = *b"RESO";
pub const TAG_FPS: Tag = *b"FPS ";
pub const TAG_OUTP: Tag = *b"OUTP";
pub const TAG_AUDN: Tag = *b"AUDN";
pub const TAG_FILT: Tag = *b"FILT";
pub const TAG_IMPT: Tag = *b"IMPT";
pub const TAG_CLIP: Tag = *b"CLIP";
pub const TAG_OVER: Tag = *b"OVER";

/// Write one chunk.
pub fn write_chunk<W: Write>(writer: &mut W, tag: Tag, payload: &[u8]) -> io::Result<()> {
    writer.write_all(&tag)?;
    writer.write_u32::<LittleEndian>(payload.len() as u32)?;
    writer.write_all(payload)?;
    Ok(())
}

/// Read the next chunk.
///
/// `None` at a clean EOF. A truncated header or payload also ends the
/// stream with a warning instead of failing: everything read so far
/// stays usable.
pub fn read_chunk<R: Read>(reader: &mut R) -> io::Result<Option<(Tag, Vec<u8>)>> {
    let mut tag: Tag = [0; 4];
    match fill(reader, &mut tag)? {
        0 => return Ok(None),
        n if n < 4 => {
            log::warn!("truncated chunk header ({n} of 4 tag bytes)");
            return Ok(None);
        }
        _ => {}
    }

    let len = match reader.read_u32::<LittleEndian>() {
        Ok(len) => len as usize,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            log::warn!("truncated chunk header after tag {}", tag_name(tag));
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let mut payload = vec![0u8; len];
    let got = fill(reader, &mut payload)?;
    if got < len {
        log::warn!(
            "truncated payload for chunk {} ({got} of {len} bytes)",
            tag_name(tag)
        );
        return Ok(None);
    }

    Ok(Some((tag, payload)))
}

/// Printable form of a tag for log messages.
pub fn tag_name(tag: Tag) -> String {
    String::from_utf8_lossy(&tag).into_owned()
}

/// Read into `buf` until full or EOF; returns the number of bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_chunk_round_trip() {
        let mut buf = Vec::new();
        write_chunk(&mut buf, TAG_OUTP, b"exports/final.mp4").unwrap();
        write_chunk(&mut buf, TAG_AUDN, &[1]).unwrap();

        let mut cursor = Cursor::new(buf);
        let (tag, payload) = read_chunk(&mut cursor).unwrap().unwrap();
        assert_eq!(tag, TAG_OUTP);
        assert_eq!(payload, b"exports/final.mp4");

        let (tag, payload) = read_chunk(&mut cursor).unwrap().unwrap();
        assert_eq!(tag, TAG_AUDN);
        assert_eq!(payload, [1]);

        assert!(read_chunk(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn test_empty_payload() {
        let mut buf = Vec::new();
        write_chunk(&mut buf, TAG_NAME, b"").unwrap();

        let mut cursor = Cursor::new(buf);
        let (tag, payload) = read_chunk(&mut cursor).unwrap().unwrap();
        assert_eq!(tag, TAG_NAME);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_truncated_payload_ends_stream() {
        let mut buf = Vec::new();
        write_chunk(&mut buf, TAG_CLIP, b"0123456789").unwrap();
        buf.truncate(buf.len() - 4);

        let mut cursor = Cursor::new(buf);
        assert!(read_chunk(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn test_truncated_header_ends_stream() {
        let mut cursor = Cursor::new(b"CL".to_vec());
        assert!(read_chunk(&mut cursor).unwrap().is_none());
    }
}
