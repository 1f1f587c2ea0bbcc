//! Fixed preset tables the host UI can index into.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresetKind {
    Color,
    Width,
    Length,
    Texture,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PresetError {
    #[error("no {0:?} presets configured")]
    EmptyBank(PresetKind),
    #[error("{kind:?} preset index {index} out of range (0..{len})")]
    OutOfRange {
        kind: PresetKind,
        index: usize,
        len: usize,
    },
}

/// Current selection resolved against a [`PresetBank`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrailStyle {
    pub color: Option<[f32; 3]>,
    pub width: Option<f32>,
    pub length_sec: Option<f32>,
    pub texture: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct PresetBank {
    pub colors: Vec<[f32; 3]>,
    pub widths: Vec<f32>,
    pub lengths: Vec<f32>,
    pub textures: Vec<String>,
}

impl PresetBank {
    pub fn len(&self, kind: PresetKind) -> usize {
        match kind {
            PresetKind::Color => self.colors.len(),
            PresetKind::Width => self.widths.len(),
            PresetKind::Length => self.lengths.len(),
            PresetKind::Texture => self.textures.len(),
        }
    }
}

/// Tracks the chosen index per preset kind.
#[derive(Clone, Debug, Default)]
pub struct PresetSelector {
    pub bank: PresetBank,
    style: TrailStyle,
}

impl PresetSelector {
    pub fn new(bank: PresetBank) -> Self {
        Self {
            bank,
            style: TrailStyle::default(),
        }
    }

    #[inline]
    pub fn style(&self) -> &TrailStyle {
        &self.style
    }

    /// Select entry `index` of `kind`. Rejected selections leave the style untouched.
    pub fn select(&mut self, kind: PresetKind, index: usize) -> Result<&TrailStyle, PresetError> {
        let len = self.bank.len(kind);
        if len == 0 || index >= len {
            let err = if len == 0 {
                PresetError::EmptyBank(kind)
            } else {
                PresetError::OutOfRange { kind, index, len }
            };
            log::warn!("preset: {}", err);
            return Err(err);
        }
        match kind {
            PresetKind::Color => self.style.color = Some(self.bank.colors[index]),
            PresetKind::Width => self.style.width = Some(self.bank.widths[index]),
            PresetKind::Length => self.style.length_sec = Some(self.bank.lengths[index]),
            PresetKind::Texture => self.style.texture = Some(self.bank.textures[index].clone()),
        }
        log::debug!("preset: {:?} -> {}", kind, index);
        Ok(&self.style)
    }
}
