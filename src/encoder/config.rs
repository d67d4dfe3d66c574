/// Encoder-Konfiguration (Header-Optionen).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncoderConfig {
    /// `<?xml encoding='finf'?>` vor den binären Header schreiben.
    pub xml_declaration: bool,
}

impl EncoderConfig {
    /// Konfiguration mit XML-Deklaration.
    pub fn with_xml_declaration() -> Self {
        Self {
            xml_declaration: true,
        }
    }
}
