use crate::constants::*;
use crate::encoder::Encoder;
use crate::encoder::value::write_identifying_string;
use crate::integer;
use crate::{Error, Result};

impl Encoder {
    /// Element name on the third bit (C.18); `b` carries the first two bits.
    pub fn encode_element_qname(
        &mut self,
        b: u8,
        prefix: &str,
        namespace_uri: &str,
        local_name: &str,
    ) -> Result<()> {
        if self.encode_element_index(b, prefix, namespace_uri, local_name)? {
            return Ok(());
        }
        self.encode_literal_qname(b | ELEMENT_LITERAL_QNAME_FLAG, prefix, namespace_uri, local_name)
    }

    /// Schreibt den Index eines bekannten Element-Namens.
    ///
    /// Unbekannte Namen werden registriert und `false` zurückgegeben; der
    /// Aufrufer schreibt dann das Literal.
    pub(crate) fn encode_element_index(
        &mut self,
        b: u8,
        prefix: &str,
        namespace_uri: &str,
        local_name: &str,
    ) -> Result<bool> {
        let mut entry = self.vocabulary.element_name.obtain_entry(local_name);
        if let Some(index) = entry.find(prefix, namespace_uri) {
            integer::write_on_third_bit(&mut self.writer, b, index)?;
            return Ok(true);
        }
        entry.add(prefix, namespace_uri)?;
        Ok(false)
    }

    /// Attribute name on the second bit, first bit zero (C.17).
    pub fn encode_attribute_qname(
        &mut self,
        prefix: &str,
        namespace_uri: &str,
        local_name: &str,
    ) -> Result<()> {
        if self.encode_attribute_index(prefix, namespace_uri, local_name)? {
            return Ok(());
        }
        self.encode_literal_qname(ATTRIBUTE_LITERAL_QNAME_FLAG, prefix, namespace_uri, local_name)
    }

    /// Wie [`encode_element_index`](Self::encode_element_index) für Attribute.
    pub(crate) fn encode_attribute_index(
        &mut self,
        prefix: &str,
        namespace_uri: &str,
        local_name: &str,
    ) -> Result<bool> {
        let mut entry = self.vocabulary.attribute_name.obtain_entry(local_name);
        if let Some(index) = entry.find(prefix, namespace_uri) {
            integer::write_on_second_bit_first_bit_zero(&mut self.writer, index)?;
            return Ok(true);
        }
        entry.add(prefix, namespace_uri)?;
        Ok(false)
    }

    /// Literal qualified name; the local name goes through the local name table.
    pub(crate) fn encode_literal_qname(
        &mut self,
        b: u8,
        prefix: &str,
        namespace_uri: &str,
        local_name: &str,
    ) -> Result<()> {
        self.encode_literal_qname_header(b, prefix, namespace_uri)?;
        write_identifying_string(&mut self.writer, &mut self.vocabulary.local_name, local_name)
    }

    /// Literal qualified name with the local name given as UTF-8 octets.
    ///
    /// Der Local Name läuft trotzdem über die Tabelle, sonst weicht die
    /// Index-Vergabe des Decoders ab.
    pub(crate) fn encode_literal_qname_utf8(
        &mut self,
        b: u8,
        prefix: &str,
        namespace_uri: &str,
        local_name: &[u8],
    ) -> Result<()> {
        let local_name = std::str::from_utf8(local_name)
            .map_err(|e| Error::usage(format!("local name is not UTF-8: {e}")))?;
        self.encode_literal_qname(b, prefix, namespace_uri, local_name)
    }

    /// Literal header with a local name index.
    pub(crate) fn encode_literal_qname_indexed(
        &mut self,
        b: u8,
        prefix: &str,
        namespace_uri: &str,
        local_name_index: u32,
    ) -> Result<()> {
        self.encode_literal_qname_header(b, prefix, namespace_uri)?;
        integer::write_on_second_bit_first_bit_one(&mut self.writer, local_name_index)
    }

    /// Flag-Octet plus Prefix und Namespace.
    ///
    /// Ein Prefix ohne Namespace wird nicht kodiert.
    fn encode_literal_qname_header(
        &mut self,
        mut b: u8,
        prefix: &str,
        namespace_uri: &str,
    ) -> Result<()> {
        let has_namespace = !namespace_uri.is_empty();
        let has_prefix = has_namespace && !prefix.is_empty();
        if has_namespace {
            b |= LITERAL_QNAME_NAMESPACE_NAME_FLAG;
        }
        if has_prefix {
            b |= LITERAL_QNAME_PREFIX_FLAG;
        }
        self.writer.write(b);
        if has_prefix {
            write_identifying_string(&mut self.writer, &mut self.vocabulary.prefix, prefix)?;
        }
        if has_namespace {
            write_identifying_string(
                &mut self.writer,
                &mut self.vocabulary.namespace_name,
                namespace_uri,
            )?;
        }
        Ok(())
    }
}
