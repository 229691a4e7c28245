use serde::{Deserialize, Serialize};
use validator::Validate;

/// Dish category, fixed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Categoria {
    Antipasto,
    PrimoPiatto,
    PiattoPrincipale,
    Dessert,
    Altro,
}

impl Categoria {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Antipasto => "ANTIPASTO",
            Self::PrimoPiatto => "PRIMO_PIATTO",
            Self::PiattoPrincipale => "PIATTO_PRINCIPALE",
            Self::Dessert => "DESSERT",
            Self::Altro => "ALTRO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FoodType {
    Carne,
    Verdura,
    Pesce,
}

impl FoodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Carne => "CARNE",
            Self::Verdura => "VERDURA",
            Self::Pesce => "PESCE",
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDishRequest {
    #[validate(length(min = 1, max = 120))]
    pub nome_piatto: String,
    pub categoria: Categoria,
    #[validate(length(max = 500))]
    pub descrizione: Option<String>,
    pub food_type: FoodType,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDishRequest {
    #[validate(length(min = 1, max = 120))]
    pub nome_piatto: Option<String>,
    pub categoria: Option<Categoria>,
    #[validate(length(max = 500))]
    pub descrizione: Option<String>,
    pub food_type: Option<FoodType>,
}

#[derive(Debug, Deserialize)]
pub struct ListDishesQuery {
    pub categoria: Option<Categoria>,
    pub limit: Option<i64>,
}

impl ListDishesQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }
}

/// Trim, and collapse a blank description to absent.
pub fn normalize_descrizione(descrizione: Option<String>) -> Option<String> {
    descrizione
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categoria_rejects_unknown_members() {
        assert!(serde_json::from_str::<Categoria>("\"PRIMO_PIATTO\"").is_ok());
        assert!(serde_json::from_str::<Categoria>("\"ZUPPA\"").is_err());
        assert!(serde_json::from_str::<FoodType>("\"PESCE\"").is_ok());
        assert!(serde_json::from_str::<FoodType>("\"FORMAGGIO\"").is_err());
    }

    #[test]
    fn categoria_round_trips_through_as_str() {
        for c in [
            Categoria::Antipasto,
            Categoria::PrimoPiatto,
            Categoria::PiattoPrincipale,
            Categoria::Dessert,
            Categoria::Altro,
        ] {
            let parsed: Categoria =
                serde_json::from_str(&format!("\"{}\"", c.as_str())).unwrap();
            assert_eq!(parsed, c);
        }
    }

    #[test]
    fn create_request_enforces_lengths() {
        let req: CreateDishRequest = serde_json::from_value(serde_json::json!({
            "nomePiatto": "Risotto",
            "categoria": "PRIMO_PIATTO",
            "foodType": "VERDURA",
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let req = CreateDishRequest {
            nome_piatto: "".into(),
            categoria: Categoria::Altro,
            descrizione: None,
            food_type: FoodType::Carne,
        };
        assert!(req.validate().is_err());

        let req = CreateDishRequest {
            nome_piatto: "ok".into(),
            categoria: Categoria::Altro,
            descrizione: Some("x".repeat(501)),
            food_type: FoodType::Carne,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn blank_description_normalizes_to_none() {
        assert_eq!(normalize_descrizione(Some("  ".into())), None);
        assert_eq!(normalize_descrizione(Some("".into())), None);
        assert_eq!(
            normalize_descrizione(Some(" al dente ".into())),
            Some("al dente".to_string())
        );
        assert_eq!(normalize_descrizione(None), None);
    }

    #[test]
    fn list_limit_clamps_to_bounds() {
        let q = ListDishesQuery {
            categoria: None,
            limit: None,
        };
        assert_eq!(q.effective_limit(), 50);
        let q = ListDishesQuery {
            categoria: None,
            limit: Some(0),
        };
        assert_eq!(q.effective_limit(), 1);
        let q = ListDishesQuery {
            categoria: None,
            limit: Some(1000),
        };
        assert_eq!(q.effective_limit(), 200);
    }
}
