use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PersonaError {
    #[error("unknown persona: {0}")]
    Unknown(String),

    #[error("persona id is empty")]
    EmptyId,

    #[error("persona catalog is empty")]
    EmptyCatalog,
}

/// Name of a persona as shown in the selection UI (e.g. "厳しい先生").
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonaId(String);

impl PersonaId {
    /// # Errors
    ///
    /// Returns `PersonaError::EmptyId` for blank ids.
    pub fn new(id: impl Into<String>) -> Result<Self, PersonaError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(PersonaError::EmptyId);
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PersonaId({})", self.0)
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named voice injected into the evaluator's system instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,
    pub instruction: String,
}

/// Ordered mapping from persona id to instruction text.
///
/// The first entry is the default persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaCatalog {
    personas: Vec<Persona>,
}

const TRAVEL_PERSONAS: [(&str, &str); 5] = [
    (
        "お笑い芸人",
        "あなたは海外旅行に詳しい、人気のお笑い芸人です。ユーザの回答にツッコミを入れながらの解説を心がけてください。",
    ),
    (
        "気の合う親友",
        "あなたは海外旅行によく行く、回答者の親友です。空気を楽しくしながら、自分の海外経験から学んだことを教えます。",
    ),
    (
        "元気な先輩",
        "あなたはギャグを言うのが好きな、回答者の先輩です。先輩としてのアドバイスをしつつ、ギャグを言いながらの解説を心がけてください。",
    ),
    (
        "優しいお母さん",
        "あなたは回答者の、優しいお母さんです。子供が心配な親心から、海外旅行で危険な目に遭わないよう、しっかりアドバイスをしてください。",
    ),
    (
        "厳しい先生",
        "あなたは海外旅行に詳しい、生徒を厳しく指導する先生です。ユーザーの回答評価や、解説の口調は常に厳しくしてください。",
    ),
];

impl PersonaCatalog {
    /// Build a catalog from explicit entries.
    ///
    /// # Errors
    ///
    /// Returns `PersonaError::EmptyCatalog` when no personas are given.
    pub fn new(personas: Vec<Persona>) -> Result<Self, PersonaError> {
        if personas.is_empty() {
            return Err(PersonaError::EmptyCatalog);
        }
        Ok(Self { personas })
    }

    /// The built-in travel-quiz personas.
    #[must_use]
    pub fn travel() -> Self {
        let personas = TRAVEL_PERSONAS
            .iter()
            .map(|(id, instruction)| Persona {
                id: PersonaId((*id).to_string()),
                instruction: (*instruction).to_string(),
            })
            .collect();
        Self { personas }
    }

    #[must_use]
    pub fn default_persona(&self) -> &Persona {
        // Non-empty by construction.
        &self.personas[0]
    }

    #[must_use]
    pub fn get(&self, id: &PersonaId) -> Option<&Persona> {
        self.personas.iter().find(|persona| &persona.id == id)
    }

    /// Look up an instruction by id.
    ///
    /// # Errors
    ///
    /// Returns `PersonaError::Unknown` if the id is not in the catalog.
    pub fn instruction(&self, id: &PersonaId) -> Result<&str, PersonaError> {
        self.get(id)
            .map(|persona| persona.instruction.as_str())
            .ok_or_else(|| PersonaError::Unknown(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &PersonaId> {
        self.personas.iter().map(|persona| &persona.id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.personas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::travel()
    }
}
