use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use raya_core::drafter::{DrafterError, MessageDrafter};

/// Festive lines used when the generative service is unavailable.
pub const FALLBACK_GREETINGS: [&str; 5] = [
    "Semoga Syawal ini membawa seribu keberkatan dan kebahagiaan buat keluarga tercinta.",
    "Keindahan Aidilfitri terpancar pada senyuman tulus ikhlas. Maaf Zahir dan Batin.",
    "Abadikan setiap detik indah di hari kemenangan ini bersama yang tersayang.",
    "Raya disambut dengan penuh kesyukuran, memori tercipta dengan penuh keindahan.",
    "Selamat Hari Raya Aidilfitri. Semoga ukhuwah kita sentiasa mekar mewangi.",
];

/// Deterministic greeting: the line is keyed on the customer name so the
/// same customer always sees the same text.
pub fn fallback_greeting(user_name: &str) -> String {
    let line = FALLBACK_GREETINGS[user_name.len() % FALLBACK_GREETINGS.len()];
    format!("{} Selamat Hari Raya, {}!", line, user_name)
}

/// Fixed confirmation body substituted when drafting fails or times out.
pub fn fallback_confirmation(booking_ref: &str) -> String {
    format!(
        "Alhamdulillah, pembayaran anda untuk tempahan #{} telah diterima. \
         Sila log masuk ke portal kami untuk mendapatkan Tiket QR anda. \
         Selamat Hari Raya!",
        booking_ref
    )
}

/// Drafter used when no generative endpoint is configured: always answers
/// with the deterministic fallback texts.
pub struct FallbackDrafter;

#[async_trait]
impl MessageDrafter for FallbackDrafter {
    async fn draft_confirmation(
        &self,
        _user_name: &str,
        booking_ref: &str,
    ) -> Result<String, DrafterError> {
        Ok(fallback_confirmation(booking_ref))
    }

    async fn draft_greeting(&self, user_name: &str) -> Result<String, DrafterError> {
        Ok(fallback_greeting(user_name))
    }
}

/// Client for a `generateContent`-style text endpoint. Transport errors,
/// non-success statuses and empty candidates all map to `Unavailable`; the
/// caller recovers with the fallback texts.
pub struct GenAiDrafter {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GenAiDrafter {
    pub fn new(
        endpoint: String,
        api_key: String,
        request_timeout: Duration,
    ) -> Result<Self, DrafterError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| DrafterError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String, DrafterError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| DrafterError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| DrafterError::Unavailable(e.to_string()))?;

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DrafterError::Unavailable(e.to_string()))?;
        extract_text(&payload).ok_or_else(|| DrafterError::Unavailable("empty candidate".into()))
    }
}

#[async_trait]
impl MessageDrafter for GenAiDrafter {
    async fn draft_confirmation(
        &self,
        user_name: &str,
        booking_ref: &str,
    ) -> Result<String, DrafterError> {
        let prompt = format!(
            "Tulis satu mesej ringkas (3-4 ayat) untuk emel pengesahan pembayaran \
             tempahan studio foto raya bagi pelanggan bernama {user_name} \
             (ID Tempahan: {booking_ref}). Beritahu mereka bahawa pembayaran telah \
             diterima dan QR code serta tiket kini sedia untuk dimuat turun di \
             dashboard. Gunakan nada yang sangat mesra dan bertema Aidilfitri."
        );
        self.generate(&prompt).await
    }

    async fn draft_greeting(&self, user_name: &str) -> Result<String, DrafterError> {
        let prompt = format!(
            "Berikan satu ucapan selamat Hari Raya Aidilfitri yang sangat pendek, \
             puitis, dan mewah untuk pelanggan bernama {user_name}. Gunakan Bahasa \
             Melayu yang sangat sopan. Maksimum 15 patah perkataan."
        );
        self.generate(&prompt).await
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

fn extract_text(response: &GenerateResponse) -> Option<String> {
    let text = response
        .candidates
        .first()?
        .content
        .parts
        .first()?
        .text
        .trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
