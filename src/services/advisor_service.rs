use std::sync::Arc;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{error, info, warn};

use crate::domain::{AiPersona, AiResponse, AnalysisScope, HospitalType, Submission};
use crate::errors::AppError;
use crate::external::generative_provider::{GenerativeError, GenerativeProvider};
use crate::utils;

const MAX_ATTEMPTS: u32 = 3;

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\n(.*?)\n```").expect("fenced JSON pattern")
});

/// Obtains a structured analysis from the generative service. Every
/// invocation builds a fresh prompt and is a fresh network round trip; there
/// is no caching.
pub struct AdvisorService {
    provider: Arc<dyn GenerativeProvider>,
    backoff_base: Duration,
}

impl AdvisorService {
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        Self {
            provider,
            backoff_base: Duration::from_secs(1),
        }
    }

    /// Same service with a different backoff unit, for tests.
    pub fn with_backoff_base(provider: Arc<dyn GenerativeProvider>, backoff_base: Duration) -> Self {
        Self {
            provider,
            backoff_base,
        }
    }

    /// Up to 3 attempts with 1s/2s backoff between them. A network failure, a
    /// service-level error and a non-parseable response all count as a failed
    /// attempt. After the last failure the caller gets a service error with a
    /// fixed message wrapping the final underlying failure.
    pub async fn optimization_suggestions(
        &self,
        submission: &Submission,
        atr: f64,
    ) -> Result<AiResponse, AppError> {
        let prompt = build_prompt(submission, atr);
        info!(
            "Requesting AI analysis (target: {}, persona: {})",
            submission.unit_identifier(),
            submission.ai_persona.as_str()
        );

        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = match self.provider.generate(&prompt).await {
                Ok(text) => parse_ai_response(&text),
                Err(e) => Err(e),
            };
            match result {
                Ok(response) => {
                    info!("AI analysis succeeded on attempt {}/{}", attempt, MAX_ATTEMPTS);
                    return Ok(response);
                }
                Err(e) => {
                    if attempt >= MAX_ATTEMPTS {
                        error!("AI analysis failed after {} attempts: {}", MAX_ATTEMPTS, e);
                        return Err(AppError::Ai {
                            message: format!(
                                "Layanan AI tidak merespons setelah {MAX_ATTEMPTS} percobaan. \
                                 Ini bisa jadi karena masalah jaringan atau gangguan pada layanan. \
                                 Silakan coba beberapa saat lagi."
                            ),
                            source: e,
                        });
                    }
                    let delay = self.backoff_base * 2u32.pow(attempt - 1);
                    warn!(
                        "AI analysis attempt {}/{} failed: {}. Retrying in {:?}...",
                        attempt, MAX_ATTEMPTS, e, delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Parse the service's text response: direct JSON first, then a payload
/// inside a markdown code fence (```/```json).
fn parse_ai_response(text: &str) -> Result<AiResponse, GenerativeError> {
    let trimmed = text.trim();
    match serde_json::from_str(trimmed) {
        Ok(response) => Ok(response),
        Err(direct_err) => {
            if let Some(captures) = FENCED_JSON.captures(trimmed) {
                serde_json::from_str(&captures[1]).map_err(|e| {
                    GenerativeError::InvalidResponse(format!("fenced JSON did not parse: {e}"))
                })
            } else {
                Err(GenerativeError::InvalidResponse(format!(
                    "response is not valid JSON: {direct_err}"
                )))
            }
        }
    }
}

fn persona_instruction(persona: AiPersona) -> &'static str {
    match persona {
        AiPersona::Strategic => {
            "Anda adalah seorang Analis Strategis. Fokus utama Anda adalah posisi pasar jangka \
             panjang, keunggulan kompetitif, dan peluang investasi strategis. Analisis Anda harus \
             visioner, berwawasan ke depan, dan berorientasi pada pertumbuhan berkelanjutan."
        }
        AiPersona::Operational => {
            "Anda adalah seorang Ahli Efisiensi Operasional. Fokus utama Anda adalah pada prinsip \
             Lean Healthcare, optimalisasi alur kerja, utilisasi aset secara maksimal, eliminasi \
             pemborosan, dan perbaikan proses yang dapat segera diimplementasikan. Analisis Anda \
             harus taktis, detail, dan berbasis data."
        }
        AiPersona::Financial => {
            "Anda adalah seorang Peramal Keuangan. Fokus utama Anda adalah pada profitabilitas, \
             arus kas, kesehatan neraca, mitigasi risiko finansial, dan dampak kuantitatif dari \
             setiap rekomendasi terhadap bottom-line. Analisis Anda harus cermat, kuantitatif, \
             dan menekankan kelayakan finansial."
        }
    }
}

/// Deterministic prompt embedding the persona instruction, the hospital
/// context, the dot-grouped monetary figures and the computed ratio, plus the
/// JSON schema the service must answer with.
fn build_prompt(submission: &Submission, atr: f64) -> String {
    let analysis_target = submission.unit_identifier();
    let is_global = submission.analysis_scope == AnalysisScope::Global;

    let scope_context = if is_global {
        "keseluruhan rumah sakit (skala strategis dan makro)".to_string()
    } else {
        format!("unit/departemen spesifik: \"{analysis_target}\" (skala operasional dan taktis)")
    };

    let hospital_type_context = match (
        submission.hospital_type,
        submission.hospital_specialty.as_deref(),
    ) {
        (HospitalType::Umum, _) => "Rumah Sakit Umum".to_string(),
        (HospitalType::Khusus, Some(specialty)) => {
            format!("Rumah Sakit Khusus dengan fokus pada {specialty}")
        }
        (HospitalType::Khusus, None) => "Rumah Sakit Khusus".to_string(),
    };

    let bpjs_context = match submission.bpjs_status {
        crate::domain::BpjsStatus::Bpjs => "yang mayoritas melayani pasien BPJS Kesehatan",
        crate::domain::BpjsStatus::NonBpjs => "beroperasi sebagai rumah sakit non-BPJS",
    };

    let scope_recommendation = if is_global {
        "rekomendasi strategis dengan dampak luas di seluruh organisasi."
    } else {
        "rekomendasi taktis yang dapat diimplementasikan langsung di tingkat unit."
    };

    format!(
        r#"{persona} Anda memiliki keahlian mendalam dalam efisiensi operasional, optimalisasi aset, dan keuangan layanan kesehatan, khususnya dalam konteks Indonesia.
Analisis Anda harus sangat tajam, presisi, dan didasarkan pada prinsip-prinsip manajemen modern. Rekomendasi Anda harus strategis, dapat ditindaklanjuti, dan memiliki dampak yang terukur sesuai dengan persona Anda.

Konteks Rumah Sakit:
- Tipe: {hospital_type_context}
- Model Bisnis: {bpjs_context}

Lakukan analisis mendalam terhadap data keuangan berikut untuk {scope_context}:
- Pendapatan Bersih: Rp {net_revenue}
- Total Aset (Awal Periode): Rp {start_assets}
- Total Aset (Akhir Periode): Rp {end_assets}
- Rasio Perputaran Aset (ATR) Terhitung: {atr}

Tugas Anda:
1. **Analisis Mendalam:** Berikan analisis multidimensional. Jangan hanya menyatakan apakah ATR baik atau buruk. Jelaskan APA ARTINYA bagi rumah sakit dari perspektif:
    a. **Kesehatan Finansial:** Likuiditas, kemampuan menghasilkan pendapatan dari aset.
    b. **Efisiensi Operasional:** Potensi aset yang kurang dimanfaatkan, hambatan alur kerja, atau penjadwalan yang tidak efisien.
    c. **Posisi Strategis:** Bagaimana hal ini dapat memengaruhi kemampuan rumah sakit untuk berinvestasi dalam teknologi baru atau bersaing di pasar.

2. **Rekomendasi Strategis & Terstruktur:** Berikan rekomendasi yang sangat spesifik dan terstruktur, selaras dengan persona Anda.
    - Kaitkan setiap rekomendasi secara langsung dengan data dan konteks yang diberikan.
    - Untuk konteks {bpjs_context}, pertimbangkan dampak tarif INA-CBG dan pentingnya manajemen piutang yang efisien.
    - Untuk konteks {hospital_type_context}, fokus pada utilisasi aset khusus berbiaya tinggi.
    - Untuk {scope_context}, berikan {scope_recommendation}

Berikan respons dalam format JSON dengan struktur berikut:
{{
  "analysis": {{
    "financialHealth": "analisis kesehatan finansial...",
    "operationalEfficiency": "analisis efisiensi operasional...",
    "strategicPosition": "analisis posisi strategis..."
  }},
  "recommendations": [
    {{
      "category": "kategori rekomendasi",
      "suggestions": [
        {{
          "action": "tindakan spesifik...",
          "rationale": "alasan dan dampak...",
          "kpi": "indikator kinerja terukur...",
          "implementation_steps": "langkah implementasi...",
          "potential_risk": "risiko dan mitigasi..."
        }}
      ]
    }}
  ]
}}

Pastikan semua teks dalam respons menggunakan Bahasa Indonesia yang profesional dan jelas."#,
        persona = persona_instruction(submission.ai_persona),
        net_revenue = utils::format_with_dots(submission.net_revenue),
        start_assets = utils::format_with_dots(submission.start_assets),
        end_assets = utils::format_with_dots(submission.end_assets),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::domain::{BpjsStatus, GLOBAL_IDENTIFIER};

    const VALID_PAYLOAD: &str = r#"{
        "analysis": {
            "financialHealth": "likuiditas memadai",
            "operationalEfficiency": "utilisasi aset rendah",
            "strategicPosition": "ruang investasi terbatas"
        },
        "recommendations": [
            {
                "category": "Utilisasi Aset",
                "suggestions": [
                    {
                        "action": "audit utilisasi alat radiologi",
                        "rationale": "alat mahal berjalan di bawah kapasitas",
                        "kpi": "utilisasi >= 70%",
                        "implementation_steps": "inventarisasi, penjadwalan ulang",
                        "potential_risk": "resistensi jadwal antar unit"
                    }
                ]
            }
        ]
    }"#;

    /// Provider that replays a scripted sequence of outcomes.
    struct ScriptedProvider {
        script: Mutex<Vec<Result<String, GenerativeError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Result<String, GenerativeError>>) -> Self {
            Self {
                script: Mutex::new(script),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl GenerativeProvider for ScriptedProvider {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerativeError> {
            *self.calls.lock().unwrap() += 1;
            self.script.lock().unwrap().remove(0)
        }
    }

    fn submission() -> Submission {
        Submission {
            analysis_scope: AnalysisScope::Unit,
            unit_name: Some("Unit Hemodialisa".to_string()),
            net_revenue: 50_000_000_000,
            start_assets: 80_000_000_000,
            end_assets: 85_000_000_000,
            bpjs_status: BpjsStatus::Bpjs,
            hospital_type: HospitalType::Umum,
            hospital_specialty: None,
            ai_persona: AiPersona::Operational,
        }
    }

    #[test]
    fn parses_plain_and_fenced_payloads_identically() {
        let plain = parse_ai_response(VALID_PAYLOAD).unwrap();
        let fenced = parse_ai_response(&format!("```json\n{VALID_PAYLOAD}\n```")).unwrap();
        let fenced_untagged = parse_ai_response(&format!("```\n{VALID_PAYLOAD}\n```")).unwrap();
        assert_eq!(plain.recommendations[0].category, "Utilisasi Aset");
        assert_eq!(
            fenced.analysis.financial_health,
            plain.analysis.financial_health
        );
        assert_eq!(
            fenced_untagged.recommendations[0].suggestions[0].kpi,
            plain.recommendations[0].suggestions[0].kpi
        );
    }

    #[test]
    fn unparseable_response_is_an_invalid_response_error() {
        assert!(matches!(
            parse_ai_response("maaf, saya tidak mengerti"),
            Err(GenerativeError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_ai_response("```json\n{broken\n```"),
            Err(GenerativeError::InvalidResponse(_))
        ));
    }

    #[test]
    fn prompt_embeds_context_and_figures() {
        let prompt = build_prompt(&submission(), 0.61);
        assert!(prompt.starts_with("Anda adalah seorang Ahli Efisiensi Operasional."));
        assert!(prompt.contains("unit/departemen spesifik: \"Unit Hemodialisa\""));
        assert!(prompt.contains("Rp 50.000.000.000"));
        assert!(prompt.contains("Rp 80.000.000.000"));
        assert!(prompt.contains("Rp 85.000.000.000"));
        assert!(prompt.contains("Rasio Perputaran Aset (ATR) Terhitung: 0.61"));
        assert!(prompt.contains("mayoritas melayani pasien BPJS Kesehatan"));
        assert!(prompt.contains("\"implementation_steps\""));
    }

    #[test]
    fn global_scope_prompt_names_the_whole_hospital() {
        let mut data = submission();
        data.analysis_scope = AnalysisScope::Global;
        data.unit_name = None;
        data.hospital_type = HospitalType::Khusus;
        data.hospital_specialty = Some("Mata".to_string());
        let prompt = build_prompt(&data, 1.2);
        assert!(prompt.contains("keseluruhan rumah sakit (skala strategis dan makro)"));
        assert!(prompt.contains("Rumah Sakit Khusus dengan fokus pada Mata"));
        assert!(!prompt.contains(GLOBAL_IDENTIFIER));
        assert!(prompt.contains("rekomendasi strategis dengan dampak luas"));
    }

    #[tokio::test(start_paused = true)]
    async fn two_failures_then_success_takes_three_attempts() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(GenerativeError::Timeout),
            Ok("tidak dalam format JSON".to_string()),
            Ok(VALID_PAYLOAD.to_string()),
        ]));
        let advisor = AdvisorService::new(Arc::clone(&provider) as Arc<dyn GenerativeProvider>);

        let started = Instant::now();
        let response = advisor
            .optimization_suggestions(&submission(), 0.61)
            .await
            .unwrap();

        assert_eq!(provider.calls(), 3);
        // backoff 1s after the first failure, 2s after the second
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert_eq!(response.recommendations.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn three_failures_surface_the_last_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(GenerativeError::Network("connection reset".into())),
            Err(GenerativeError::Timeout),
            Err(GenerativeError::Api("HTTP 500: internal".into())),
        ]));
        let advisor = AdvisorService::new(Arc::clone(&provider) as Arc<dyn GenerativeProvider>);

        let err = advisor
            .optimization_suggestions(&submission(), 0.61)
            .await
            .unwrap_err();

        assert_eq!(provider.calls(), 3);
        match err {
            AppError::Ai { message, source } => {
                assert!(message.contains("setelah 3 percobaan"));
                assert!(matches!(source, GenerativeError::Api(_)));
            }
            other => panic!("expected AppError::Ai, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_on_first_attempt_does_not_retry() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(VALID_PAYLOAD.to_string())]));
        let advisor = AdvisorService::with_backoff_base(
            Arc::clone(&provider) as Arc<dyn GenerativeProvider>,
            Duration::from_millis(1),
        );
        advisor
            .optimization_suggestions(&submission(), 0.61)
            .await
            .unwrap();
        assert_eq!(provider.calls(), 1);
    }
}
