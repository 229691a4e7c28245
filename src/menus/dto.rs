use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

pub const MAX_CUISINE_TYPES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Balance {
    Gustosa,
    Equilibrato,
    Leggera,
}

impl Balance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gustosa => "GUSTOSA",
            Self::Equilibrato => "EQUILIBRATO",
            Self::Leggera => "LEGGERA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CuisineType {
    Italiana,
    Regionale,
    Locale,
    Fusion,
    Etnica,
    Vegetariana,
    Vegana,
    Gourmet,
}

impl CuisineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Italiana => "ITALIANA",
            Self::Regionale => "REGIONALE",
            Self::Locale => "LOCALE",
            Self::Fusion => "FUSION",
            Self::Etnica => "ETNICA",
            Self::Vegetariana => "VEGETARIANA",
            Self::Vegana => "VEGANA",
            Self::Gourmet => "GOURMET",
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuRequest {
    #[validate(length(min = 1, max = 120))]
    pub nome: String,
    #[validate(length(max = 500))]
    pub descrizione: Option<String>,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    pub balance: Balance,
    #[serde(default)]
    pub cuisine_types: Vec<CuisineType>,
}

/// `imageUrl`/`imagePath` distinguish "absent" (keep) from explicit `null`
/// (clear) via the double option.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuRequest {
    #[validate(length(min = 1, max = 120))]
    pub nome: Option<String>,
    #[validate(length(max = 500))]
    pub descrizione: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_path: Option<Option<String>>,
    pub balance: Option<Balance>,
    pub cuisine_types: Option<Vec<CuisineType>>,
}

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_and_cuisine_reject_unknown_members() {
        assert!(serde_json::from_str::<Balance>("\"GUSTOSA\"").is_ok());
        assert!(serde_json::from_str::<Balance>("\"PICCANTE\"").is_err());
        assert!(serde_json::from_str::<CuisineType>("\"FUSION\"").is_ok());
        assert!(serde_json::from_str::<CuisineType>("\"MOLECOLARE\"").is_err());
    }

    #[test]
    fn create_defaults_to_no_cuisine_types() {
        let req: CreateMenuRequest = serde_json::from_value(serde_json::json!({
            "nome": "Degustazione",
            "balance": "GUSTOSA",
        }))
        .unwrap();
        assert!(req.cuisine_types.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_distinguishes_absent_from_null_image() {
        let absent: UpdateMenuRequest =
            serde_json::from_value(serde_json::json!({ "nome": "Nuovo" })).unwrap();
        assert_eq!(absent.image_url, None);

        let cleared: UpdateMenuRequest =
            serde_json::from_value(serde_json::json!({ "imageUrl": null })).unwrap();
        assert_eq!(cleared.image_url, Some(None));

        let replaced: UpdateMenuRequest = serde_json::from_value(
            serde_json::json!({ "imageUrl": "https://cdn.example.com/m.jpg" }),
        )
        .unwrap();
        assert_eq!(
            replaced.image_url,
            Some(Some("https://cdn.example.com/m.jpg".to_string()))
        );
    }

    #[test]
    fn update_validates_lengths_when_supplied() {
        let req = UpdateMenuRequest {
            nome: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateMenuRequest {
            descrizione: Some("x".repeat(501)),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
