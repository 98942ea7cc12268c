use crate::error::Result;
use crate::obfuscator::Obfuscator;
use crate::shortcode::ShortCode;

/// The encoder between sequence ids and short codes.
///
/// Without an obfuscator, `encode` is the plain base-62 numeral of the id:
/// small ids give short codes and length grows only as needed. With an
/// obfuscator the id is scrambled first. Both modes are bijections on `u64`,
/// so `decode(encode(id)) == id` for every id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortCodeCodec {
    obfuscator: Option<Obfuscator>,
}

impl ShortCodeCodec {
    /// A codec that emits plain base-62 numerals.
    pub fn plain() -> Self {
        Self { obfuscator: None }
    }

    /// A codec that scrambles ids before encoding them.
    pub fn obfuscated(obfuscator: Obfuscator) -> Self {
        Self {
            obfuscator: Some(obfuscator),
        }
    }

    pub fn is_obfuscated(&self) -> bool {
        self.obfuscator.is_some()
    }

    pub fn encode(&self, id: u64) -> ShortCode {
        let value = match &self.obfuscator {
            Some(obfuscator) => obfuscator.obfuscate(id),
            None => id,
        };
        ShortCode::from_value(value)
    }

    pub fn decode(&self, code: &ShortCode) -> u64 {
        match &self.obfuscator {
            Some(obfuscator) => obfuscator.reveal(code.value()),
            None => code.value(),
        }
    }

    /// Parses and decodes untrusted input in one step.
    pub fn decode_str(&self, code: &str) -> Result<u64> {
        let code = ShortCode::parse(code)?;
        Ok(self.decode(&code))
    }
}
