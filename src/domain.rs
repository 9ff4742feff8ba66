use serde::{Deserialize, Serialize};

/// Display identifier used for hospital-wide analyses, both in prompts and in
/// historical trend labels.
pub const GLOBAL_IDENTIFIER: &str = "Seluruh Rumah Sakit";

// Closed list of recognized units/departments. A shareable-link `unitName`
// that is not in this list is ignored.
pub const DEPARTMENTS: &[&str] = &[
    "Instalasi Gawat Darurat (IGD)",
    "Unit Perawatan Intensif (ICU)",
    "Unit Perawatan Tinggi (HCU)",
    "Unit Perawatan Koroner Intensif (ICCU)",
    "ICU Anak/Neonatal (PICU/NICU)",
    "Kamar Operasi (Bedah Sentral)",
    "Ruang Pemulihan (RR)",
    "Klinik Rawat Jalan (Umum & Spesialis)",
    "Rawat Inap - Penyakit Dalam",
    "Rawat Inap - Bedah",
    "Rawat Inap - Anak",
    "Rawat Inap - Obstetri & Ginekologi",
    "Rawat Inap - Saraf",
    "Rawat Inap - VIP/VVIP",
    "Ruang Isolasi",
    "Laboratorium (Klinik & Patologi Anatomi)",
    "Radiologi & Pencitraan Diagnostik",
    "Farmasi & Gudang Farmasi",
    "Rehabilitasi Medik (Fisioterapi, Okupasi)",
    "Unit Hemodialisa",
    "Unit Kemoterapi",
    "Bank Darah",
    "Unit Endoskopi",
    "Laboratorium Kateterisasi (Cath Lab)",
    "Gizi & Dapur",
    "Rekam Medis",
    "CSSD & Laundry",
    "Pemeliharaan Sarana Prasarana RS (IPSRS)",
    "Sanitasi & Pengelolaan Limbah",
    "Ambulans & Transportasi",
    "Instalasi Pemulasaraan Jenazah",
    "Manajemen, Keuangan, & SDM",
    "Humas & Pemasaran",
    "IT / SIMRS",
    "Lainnya",
];

// Closed list of recognized specializations for `hospitalType = khusus`.
pub const SPECIALTY_HOSPITALS: &[&str] = &[
    "Ibu dan Anak (KIA)",
    "Jantung dan Pembuluh Darah",
    "Kanker (Onkologi)",
    "Otak dan Saraf (Neurologi)",
    "Paru (Respirasi/Pulmonologi)",
    "THT (Telinga, Hidung, Tenggorokan)",
    "Mata",
    "Gigi dan Mulut",
    "Bedah (Umum & Terspesialisasi)",
    "Ortopedi dan Traumatologi",
    "Penyakit Infeksi Tropis",
    "Jiwa",
    "Kulit dan Kelamin",
    "Ginjal dan Hipertensi (Nefrologi)",
    "Pencernaan dan Hati (Gastroenterologi-Hepatologi)",
    "Rehabilitasi Medik",
    "Geriatri",
    "Ketergantungan Obat & Rehabilitasi",
    "Urologi",
    "Bedah Plastik & Estetika",
    "Kedokteran Olahraga",
    "Lainnya",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisScope {
    Unit,
    Global,
}

impl AnalysisScope {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "unit" => Some(Self::Unit),
            "global" => Some(Self::Global),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Global => "global",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BpjsStatus {
    Bpjs,
    NonBpjs,
}

impl BpjsStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bpjs" => Some(Self::Bpjs),
            "non-bpjs" => Some(Self::NonBpjs),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bpjs => "bpjs",
            Self::NonBpjs => "non-bpjs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HospitalType {
    Umum,
    Khusus,
}

impl HospitalType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "umum" => Some(Self::Umum),
            "khusus" => Some(Self::Khusus),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Umum => "umum",
            Self::Khusus => "khusus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiPersona {
    Strategic,
    Operational,
    Financial,
}

impl AiPersona {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "strategic" => Some(Self::Strategic),
            "operational" => Some(Self::Operational),
            "financial" => Some(Self::Financial),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strategic => "strategic",
            Self::Operational => "operational",
            Self::Financial => "financial",
        }
    }
}

/// Editable form state, persisted on every edit. Monetary fields hold the
/// raw dot-grouped display strings, not parsed integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub analysis_scope: AnalysisScope,
    pub bpjs_status: BpjsStatus,
    pub hospital_type: HospitalType,
    pub hospital_specialty: String,
    pub unit_name: String,
    pub net_revenue: String,
    pub start_assets: String,
    pub end_assets: String,
    pub ai_persona: AiPersona,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            analysis_scope: AnalysisScope::Unit,
            bpjs_status: BpjsStatus::Bpjs,
            hospital_type: HospitalType::Umum,
            hospital_specialty: SPECIALTY_HOSPITALS[0].to_string(),
            unit_name: DEPARTMENTS[0].to_string(),
            net_revenue: "50.000.000.000".to_string(),
            start_assets: "80.000.000.000".to_string(),
            end_assets: "85.000.000.000".to_string(),
            ai_persona: AiPersona::Strategic,
        }
    }
}

/// One finalized analysis request, built from the current form state on
/// submit. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub analysis_scope: AnalysisScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    pub net_revenue: i64,
    pub start_assets: i64,
    pub end_assets: i64,
    pub bpjs_status: BpjsStatus,
    pub hospital_type: HospitalType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_specialty: Option<String>,
    pub ai_persona: AiPersona,
}

impl Submission {
    /// Label of the analysis target: the unit name, or the whole-hospital
    /// identifier for global scope.
    pub fn unit_identifier(&self) -> &str {
        match self.analysis_scope {
            AnalysisScope::Global => GLOBAL_IDENTIFIER,
            AnalysisScope::Unit => self.unit_name.as_deref().unwrap_or(""),
        }
    }
}

/// Narrative blocks returned by the AI service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBreakdown {
    pub financial_health: String,
    pub operational_efficiency: String,
    pub strategic_position: String,
}

// Suggestion fields stay snake_case on the wire; that is the schema the
// prompt asks the model for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionableSuggestion {
    pub action: String,
    pub rationale: String,
    pub kpi: String,
    pub implementation_steps: String,
    pub potential_risk: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub suggestions: Vec<ActionableSuggestion>,
}

/// The structured payload the AI service is asked to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    pub analysis: AnalysisBreakdown,
    pub recommendations: Vec<Recommendation>,
}

/// AI payload plus the locally computed ratio. Held in transient dashboard
/// state only; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub atr: f64,
    #[serde(flatten)]
    pub ai: AiResponse,
}

/// One point of the persisted ATR time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEntry {
    pub name: String,
    pub atr: f64,
}
