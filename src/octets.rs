//! Octet buffer between the encoder core and the output sink.
//!
//! Fast Infoset is octet-aligned: every information item starts on an octet
//! boundary, flags and small integers share the high and low bits of a single
//! octet. The buffer therefore only deals in whole octets.

use std::io::Write;

/// Growable octet buffer with an optional mark.
///
/// Solange eine Mark gesetzt ist, darf der Buffer nicht in den Sink geleert
/// werden: das markierte Octet (Element-Header) kann noch nachträglich um das
/// Attribut-Flag ergänzt werden.
pub struct OctetWriter {
    buf: Vec<u8>,
    mark: Option<usize>,
}

impl OctetWriter {
    /// Creates a new empty `OctetWriter`.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(1024),
            mark: None,
        }
    }

    /// Writes a single octet.
    #[inline(always)]
    pub fn write(&mut self, octet: u8) {
        self.buf.push(octet);
    }

    /// Writes an octet slice.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Merkt sich die Position des nächsten Octets.
    pub fn mark(&mut self) {
        self.mark = Some(self.buf.len());
    }

    /// Verwirft die Mark ohne das markierte Octet zu verändern.
    pub fn reset_mark(&mut self) {
        self.mark = None;
    }

    pub fn has_mark(&self) -> bool {
        self.mark.is_some()
    }

    /// ORs `flags` into the marked octet and releases the mark.
    ///
    /// Returns `false` when no mark is set or nothing was written after it.
    pub fn patch_mark(&mut self, flags: u8) -> bool {
        let Some(pos) = self.mark.take() else {
            return false;
        };
        match self.buf.get_mut(pos) {
            Some(octet) => {
                *octet |= flags;
                true
            }
            None => false,
        }
    }

    /// Schreibt alle gepufferten Octets in den Sink und leert den Buffer.
    ///
    /// Bei gesetzter Mark passiert nichts; die Octets bleiben bis zur
    /// Auflösung der Mark im Buffer.
    pub fn drain_to(&mut self, sink: &mut impl Write) -> std::io::Result<()> {
        if self.mark.is_some() || self.buf.is_empty() {
            return Ok(());
        }
        sink.write_all(&self.buf)?;
        self.buf.clear();
        Ok(())
    }

    /// Gibt die aktuelle Buffer-Größe in Octets zurück.
    pub fn buf_len(&self) -> usize {
        self.buf.len()
    }

    /// Returns the buffered octets.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Drops buffered octets and the mark; capacity is kept.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.mark = None;
    }

    /// Finalises the writer and returns the buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for OctetWriter {
    fn default() -> Self {
        Self::new()
    }
}
