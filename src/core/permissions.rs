//! Static mapping from lodge offices to the modules they unlock.

use crate::models::position_type::PositionType;
use serde::Serialize;
use std::collections::BTreeSet;

/// Functional areas of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Dashboard,
    Irmaos,
    Cargos,
    Chancelaria,
    Tesouraria,
    Secretaria,
    Atas,
    Avisos,
    Conteudo,
    Imagens,
    Relatorios,
}

impl Module {
    pub const ALL: [Module; 11] = [
        Module::Dashboard,
        Module::Irmaos,
        Module::Cargos,
        Module::Chancelaria,
        Module::Tesouraria,
        Module::Secretaria,
        Module::Atas,
        Module::Avisos,
        Module::Conteudo,
        Module::Imagens,
        Module::Relatorios,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Irmaos => "irmaos",
            Module::Cargos => "cargos",
            Module::Chancelaria => "chancelaria",
            Module::Tesouraria => "tesouraria",
            Module::Secretaria => "secretaria",
            Module::Atas => "atas",
            Module::Avisos => "avisos",
            Module::Conteudo => "conteudo",
            Module::Imagens => "imagens",
            Module::Relatorios => "relatorios",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        Self::ALL.into_iter().find(|m| m.code() == code)
    }
}

/// Modules granted to a user: every module (`"*"`) or an explicit set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ModuleSet {
    All,
    Only(BTreeSet<Module>),
}

impl ModuleSet {
    pub fn empty() -> Self {
        ModuleSet::Only(BTreeSet::new())
    }

    pub fn contains(&self, module: Module) -> bool {
        match self {
            ModuleSet::All => true,
            ModuleSet::Only(set) => set.contains(&module),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ModuleSet::Only(set) if set.is_empty())
    }

    /// Module codes, `["*"]` for the wildcard.
    pub fn codes(&self) -> Vec<&'static str> {
        match self {
            ModuleSet::All => vec!["*"],
            ModuleSet::Only(set) => set.iter().map(Module::code).collect(),
        }
    }
}

fn only(modules: &[Module]) -> ModuleSet {
    ModuleSet::Only(modules.iter().copied().collect())
}

/// Modules unlocked by each office. Compiled in; not user-editable.
pub fn permissions_for(position: PositionType) -> ModuleSet {
    use Module::*;

    match position {
        PositionType::VeneravelMestre => ModuleSet::All,
        PositionType::PrimeiroVigilante | PositionType::SegundoVigilante => {
            only(&[Dashboard, Irmaos, Chancelaria, Relatorios])
        }
        PositionType::Orador => only(&[Dashboard, Atas, Avisos]),
        PositionType::Secretario => {
            only(&[Dashboard, Irmaos, Secretaria, Atas, Avisos, Relatorios])
        }
        PositionType::Tesoureiro => only(&[Dashboard, Tesouraria, Relatorios]),
        PositionType::Chanceler => only(&[Dashboard, Irmaos, Chancelaria]),
        PositionType::MestreDeCerimonias => only(&[Dashboard, Chancelaria]),
        PositionType::Hospitaleiro => only(&[Dashboard, Irmaos]),
        PositionType::Arquiteto => only(&[Dashboard, Conteudo, Imagens]),
        PositionType::Bibliotecario => only(&[Dashboard, Conteudo]),
        PositionType::GuardaDoTemplo => only(&[Dashboard]),
    }
}
