use serde::Deserialize;
use validator::Validate;

/// Create a photo row from an image hosted elsewhere (or already uploaded).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDishPhotoRequest {
    pub image_url: String,
    #[validate(length(max = 240))]
    pub description: Option<String>,
    pub image_width: Option<i32>,
    pub image_height: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDishPhotoRequest {
    #[validate(length(max = 240))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_enforces_description_length() {
        let req: CreateDishPhotoRequest = serde_json::from_value(serde_json::json!({
            "imageUrl": "https://cdn.example.com/a.jpg",
            "description": "Tagliatelle al ragù",
            "imageWidth": 800,
            "imageHeight": 600,
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let req = CreateDishPhotoRequest {
            image_url: "https://cdn.example.com/a.jpg".into(),
            description: Some("x".repeat(241)),
            image_width: None,
            image_height: None,
        };
        assert!(req.validate().is_err());
    }
}
