//! Instruction assembly.
//!
//! Edit mode walks [`CLAUSES`] once, in table order, and keeps the clauses whose
//! flag is active. The order of the table is the order of the sentence, no matter
//! in which order the user toggled things.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Edit,
    Generate,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Edit => "edit",
            Mode::Generate => "generate",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Enhancement {
    RemoveChains,
    RemoveBackground,
    HimalayanBackground,
    Smile,
    MaleMakeup,
    FemaleMakeup,
    Cyberpunk,
    Royal,
    Anime,
    OilPainting,
    Ethereal,
}

impl Enhancement {
    pub const ALL: [Enhancement; 11] = [
        Enhancement::RemoveChains,
        Enhancement::RemoveBackground,
        Enhancement::HimalayanBackground,
        Enhancement::Smile,
        Enhancement::MaleMakeup,
        Enhancement::FemaleMakeup,
        Enhancement::Cyberpunk,
        Enhancement::Royal,
        Enhancement::Anime,
        Enhancement::OilPainting,
        Enhancement::Ethereal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Enhancement::RemoveChains => "removeChains",
            Enhancement::RemoveBackground => "removeBackground",
            Enhancement::HimalayanBackground => "himalayanBackground",
            Enhancement::Smile => "smile",
            Enhancement::MaleMakeup => "maleMakeup",
            Enhancement::FemaleMakeup => "femaleMakeup",
            Enhancement::Cyberpunk => "cyberpunk",
            Enhancement::Royal => "royal",
            Enhancement::Anime => "anime",
            Enhancement::OilPainting => "oilPainting",
            Enhancement::Ethereal => "ethereal",
        }
    }

    /// The flag that cannot be on at the same time as this one.
    pub fn exclusive_with(self) -> Option<Enhancement> {
        match self {
            Enhancement::RemoveBackground => Some(Enhancement::HimalayanBackground),
            Enhancement::HimalayanBackground => Some(Enhancement::RemoveBackground),
            Enhancement::MaleMakeup => Some(Enhancement::FemaleMakeup),
            Enhancement::FemaleMakeup => Some(Enhancement::MaleMakeup),
            _ => None,
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl FromStr for Enhancement {
    type Err = UnknownEnhancement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Enhancement::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| UnknownEnhancement(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown enhancement `{0}`")]
pub struct UnknownEnhancement(pub String);

/// Flag → clause, in sentence order. Core edits first, then style conversions.
/// `removeChains` has no clause and never shows up in the instruction.
pub const CLAUSES: &[(Enhancement, &str)] = &[
    (
        Enhancement::RemoveBackground,
        "Remove background and replace with studio focus.",
    ),
    (
        Enhancement::HimalayanBackground,
        "Replace background with high-resolution Himalayan mountains.",
    ),
    (
        Enhancement::Smile,
        "Adjust the subject to have a warm, natural, and realistic smile.",
    ),
    (
        Enhancement::MaleMakeup,
        "Apply professional male grooming: clean skin, groomed eyebrows, and light cinematic contouring.",
    ),
    (
        Enhancement::FemaleMakeup,
        "Apply elegant female makeup: smooth skin, soft eyeliner, and natural lipstick.",
    ),
    (
        Enhancement::Cyberpunk,
        "Transform the scene into a cyberpunk aesthetic with neon lights, futuristic textures, and blue/purple color grading.",
    ),
    (
        Enhancement::Royal,
        "Drape the subject in royal attire, converting the photo into a regal historical portrait with golden ornaments.",
    ),
    (
        Enhancement::Anime,
        "Reimagine the photo as a high-quality studio Ghibli-style anime illustration.",
    ),
    (
        Enhancement::OilPainting,
        "Convert the photo into a classical museum-grade oil painting with visible brushstrokes and rich textures.",
    ),
    (
        Enhancement::Ethereal,
        "Add a magical, ethereal glow to the photo with soft focus, light blooms, and a dreamy atmosphere.",
    ),
];

/// The set of enhancement toggles for Edit mode.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    bits: u16,
}

impl Selection {
    /// Nothing selected.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn with(mut self, flag: Enhancement) -> Self {
        self.set(flag, true);
        self
    }

    pub fn is_on(&self, flag: Enhancement) -> bool {
        self.bits & flag.bit() != 0
    }

    /// Sets a flag. Turning a flag on clears its exclusive partner; turning it
    /// off leaves the partner alone.
    pub fn set(&mut self, flag: Enhancement, on: bool) {
        if on {
            self.bits |= flag.bit();
            if let Some(other) = flag.exclusive_with() {
                self.bits &= !other.bit();
            }
        } else {
            self.bits &= !flag.bit();
        }
    }

    pub fn toggle(&mut self, flag: Enhancement) {
        let on = !self.is_on(flag);
        self.set(flag, on);
    }

    pub fn active(&self) -> impl Iterator<Item = Enhancement> + '_ {
        Enhancement::ALL.into_iter().filter(|f| self.is_on(*f))
    }
}

impl Default for Selection {
    /// The starting profile: `removeChains` on, everything else off.
    fn default() -> Self {
        Self::empty().with(Enhancement::RemoveChains)
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.active().map(Enhancement::name)).finish()
    }
}

impl Serialize for Selection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(Enhancement::ALL.len()))?;
        for flag in Enhancement::ALL {
            map.serialize_entry(flag.name(), &self.is_on(flag))?;
        }
        map.end()
    }
}

pub fn assemble(mode: Mode, selection: &Selection, free_text: &str) -> String {
    match mode {
        Mode::Edit => {
            let mut clauses: Vec<&str> = CLAUSES
                .iter()
                .filter(|(flag, _)| selection.is_on(*flag))
                .map(|(_, clause)| *clause)
                .collect();
            if !free_text.is_empty() {
                clauses.push(free_text);
            }
            format!(
                "Edit this portrait professionally: {}. Ensure high detail and consistent lighting.",
                clauses.join(". ")
            )
        }
        Mode::Generate => format!(
            "Generate a high-quality professional masterpiece photograph: {}",
            free_text
        ),
    }
}

/// Secondary text feature: a social caption or a short story about the picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritingKind {
    Caption,
    Story,
}

impl WritingKind {
    pub fn prompt(self) -> &'static str {
        match self {
            WritingKind::Caption => "Write a cool Instagram caption for this photo.",
            WritingKind::Story => "Write a short creative story about this person or scene.",
        }
    }
}
