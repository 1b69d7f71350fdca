use serde::Serialize;

/// Offices of the lodge.
///
/// Declaration order is the lodge hierarchy and doubles as the tie-break when
/// one member holds more than one office on the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionType {
    VeneravelMestre,
    PrimeiroVigilante,
    SegundoVigilante,
    Orador,
    Secretario,
    Tesoureiro,
    Chanceler,
    MestreDeCerimonias,
    Hospitaleiro,
    Arquiteto,
    Bibliotecario,
    GuardaDoTemplo,
}

impl PositionType {
    pub const ALL: [PositionType; 12] = [
        PositionType::VeneravelMestre,
        PositionType::PrimeiroVigilante,
        PositionType::SegundoVigilante,
        PositionType::Orador,
        PositionType::Secretario,
        PositionType::Tesoureiro,
        PositionType::Chanceler,
        PositionType::MestreDeCerimonias,
        PositionType::Hospitaleiro,
        PositionType::Arquiteto,
        PositionType::Bibliotecario,
        PositionType::GuardaDoTemplo,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            PositionType::VeneravelMestre => "veneravel_mestre",
            PositionType::PrimeiroVigilante => "primeiro_vigilante",
            PositionType::SegundoVigilante => "segundo_vigilante",
            PositionType::Orador => "orador",
            PositionType::Secretario => "secretario",
            PositionType::Tesoureiro => "tesoureiro",
            PositionType::Chanceler => "chanceler",
            PositionType::MestreDeCerimonias => "mestre_de_cerimonias",
            PositionType::Hospitaleiro => "hospitaleiro",
            PositionType::Arquiteto => "arquiteto",
            PositionType::Bibliotecario => "bibliotecario",
            PositionType::GuardaDoTemplo => "guarda_do_templo",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PositionType::VeneravelMestre => "Veneravel Mestre",
            PositionType::PrimeiroVigilante => "Primeiro Vigilante",
            PositionType::SegundoVigilante => "Segundo Vigilante",
            PositionType::Orador => "Orador",
            PositionType::Secretario => "Secretario",
            PositionType::Tesoureiro => "Tesoureiro",
            PositionType::Chanceler => "Chanceler",
            PositionType::MestreDeCerimonias => "Mestre de Cerimonias",
            PositionType::Hospitaleiro => "Hospitaleiro",
            PositionType::Arquiteto => "Arquiteto",
            PositionType::Bibliotecario => "Bibliotecario",
            PositionType::GuardaDoTemplo => "Guarda do Templo",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.code()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == s)
    }

    /// Helper: accept CLI input in any case, with '-' or '_' as separator
    pub fn from_code(code: &str) -> Option<Self> {
        Self::from_db_str(&code.trim().to_lowercase().replace('-', "_"))
    }
}
