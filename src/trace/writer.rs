use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::records::Record;
use super::{FileHeader, Trace};

impl Trace {
    /// Write the trace to `path`, replacing any existing file, and sync it to
    /// stable storage.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        self.write_to(&mut writer)?;

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()
    }

    /// Write the header followed by each tier's records in order.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut buf = Vec::with_capacity(FileHeader::SIZE);
        self.header.encode(&mut buf);
        writer.write_all(&buf)?;

        write_records(writer, &mut buf, &self.fast)?;
        write_records(writer, &mut buf, &self.medium)?;
        write_records(writer, &mut buf, &self.slow)?;
        write_records(writer, &mut buf, &self.markers)?;

        writer.flush()
    }
}

fn write_records<W: Write, R: Record>(
    writer: &mut W,
    buf: &mut Vec<u8>,
    records: &[R],
) -> std::io::Result<()> {
    for record in records {
        buf.clear();
        record.encode(buf);
        writer.write_all(buf)?;
    }

    Ok(())
}
