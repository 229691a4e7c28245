use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDishRequest {
    pub dish_id: Uuid,
    pub ordine: Option<i32>,
}

/// Snapshot fields are immutable after insertion; only the position moves.
#[derive(Debug, Deserialize)]
pub struct UpdateMenuDishRequest {
    pub ordine: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub items: Vec<ReorderItem>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderItem {
    pub id: Uuid,
    pub ordine: i32,
}

impl ReorderRequest {
    /// The input set must be non-empty and free of duplicate row ids.
    pub fn distinct_ids(&self) -> Option<Vec<Uuid>> {
        if self.items.is_empty() {
            return None;
        }
        let mut ids: Vec<Uuid> = self.items.iter().map(|i| i.id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != self.items.len() {
            return None;
        }
        Some(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_ids_rejects_empty_and_duplicates() {
        let empty = ReorderRequest { items: vec![] };
        assert!(empty.distinct_ids().is_none());

        let id = Uuid::new_v4();
        let dup = ReorderRequest {
            items: vec![
                ReorderItem { id, ordine: 1 },
                ReorderItem { id, ordine: 2 },
            ],
        };
        assert!(dup.distinct_ids().is_none());

        let ok = ReorderRequest {
            items: vec![
                ReorderItem {
                    id: Uuid::new_v4(),
                    ordine: 2,
                },
                ReorderItem {
                    id: Uuid::new_v4(),
                    ordine: 1,
                },
            ],
        };
        assert_eq!(ok.distinct_ids().unwrap().len(), 2);
    }

    #[test]
    fn add_request_accepts_missing_ordine() {
        let req: AddDishRequest = serde_json::from_value(serde_json::json!({
            "dishId": Uuid::new_v4(),
        }))
        .unwrap();
        assert_eq!(req.ordine, None);
    }
}
