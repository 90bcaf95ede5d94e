//! Blessing endpoint.

use axum::{extract::rejection::JsonRejection, Json};
use rand::Rng;

use crate::models::{Dua, GenerateDuaRequest};

/// The fixed set of blessings.
pub const DUAS: [Dua; 3] = [
    Dua {
        dua: "Barakallahu lakum wa baraka 'alaykum wa jama'a baynakuma fii khayr",
        translation: "May Allah bless you and shower His blessings upon you and join you in goodness.",
    },
    Dua {
        dua: "Allahumma ic'al hadal 'aqda 'aqdan mubarakan wa sa'idan",
        translation: "O Allah, make this marriage a blessed and happy union.",
    },
    Dua {
        dua: "Rabbana hab lana min azwajina wa dhurriyatina qurrata a'yun",
        translation: "Our Lord, grant us from among our spouses and offspring comfort to our eyes.",
    },
];

/// Pick one blessing uniformly at random.
pub fn pick_dua() -> Dua {
    DUAS[rand::thread_rng().gen_range(0..DUAS.len())]
}

/// POST /api/generate-dua - Return a random blessing.
///
/// The guest name is accepted but does not affect the result; a missing or
/// malformed body is tolerated.
pub async fn generate_dua(body: Result<Json<GenerateDuaRequest>, JsonRejection>) -> Json<Dua> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    tracing::debug!("Generating blessing for {:?}", request.guest_name);
    Json(pick_dua())
}
