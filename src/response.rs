use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub ok: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { ok: true, data })
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, ok(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_wraps_data() {
        let json = serde_json::to_value(Envelope {
            ok: true,
            data: vec![1, 2, 3],
        })
        .unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }
}
