//! Item handlers
//!
//! Create and update take a multipart form so an image can ride along with
//! the item fields. Every successful write is followed by the ledger and
//! reminder hooks.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::{hooks, AppError, AppState, SuccessResponse, MAX_UPLOAD_SIZE};
use larder_core::models::{Item, Location, NewItem};

/// Response for item create/update
#[derive(Debug, Serialize)]
pub struct ItemWriteResponse {
    pub id: i64,
    pub image_path: Option<String>,
}

/// Image part of an item form
struct UploadedImage {
    filename: Option<String>,
    bytes: Vec<u8>,
}

/// Raw text fields of an item form, before validation
#[derive(Default)]
struct ItemForm {
    name: Option<String>,
    brand: Option<String>,
    location: Option<String>,
    purchase_date: Option<String>,
    best_by_date: Option<String>,
    price: Option<String>,
    spoiled: Option<String>,
    delete_image: Option<String>,
    image: Option<UploadedImage>,
}

impl ItemForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == "image" {
                let filename = field.file_name().map(String::from);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::bad_request("Failed to read image data"))?;

                if bytes.len() > MAX_UPLOAD_SIZE {
                    return Err(AppError::bad_request(&format!(
                        "Image too large. Maximum size is {} MB",
                        MAX_UPLOAD_SIZE / 1024 / 1024
                    )));
                }

                // Browsers send an empty part when no file was chosen
                if !bytes.is_empty() {
                    form.image = Some(UploadedImage {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
                continue;
            }

            let slot = match name.as_str() {
                "name" => &mut form.name,
                "brand" => &mut form.brand,
                "location" => &mut form.location,
                "purchase_date" => &mut form.purchase_date,
                "best_by_date" => &mut form.best_by_date,
                "price" => &mut form.price,
                "spoiled" => &mut form.spoiled,
                "delete_image" => &mut form.delete_image,
                _ => continue,
            };
            let value = field
                .text()
                .await
                .map_err(|_| AppError::bad_request(&format!("Failed to read {}", name)))?;
            *slot = Some(value);
        }

        Ok(form)
    }

    /// Validate the text fields into an item (image path left unset)
    fn to_new_item(&self) -> Result<NewItem, AppError> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("location", &self.location),
            ("purchase_date", &self.purchase_date),
            ("best_by_date", &self.best_by_date),
        ]
        .iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(field, _)| *field)
        .collect();

        if !missing.is_empty() {
            return Err(AppError::bad_request(&format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let location: Location = self
            .location
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|e: String| AppError::bad_request(&e))?;

        let price = match self.price.as_deref().map(str::trim) {
            None | Some("") => 0.0,
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite() && *p >= 0.0)
                .ok_or_else(|| AppError::bad_request(&format!("Invalid price: {}", raw)))?,
        };

        Ok(NewItem {
            name: self.name.as_deref().unwrap_or_default().trim().to_string(),
            brand: self.brand.clone(),
            location,
            purchase_date: parse_form_date("purchase_date", self.purchase_date.as_deref())?,
            best_by_date: parse_form_date("best_by_date", self.best_by_date.as_deref())?,
            price,
            image_path: None,
            spoiled: parse_flag(self.spoiled.as_deref()),
        })
    }
}

fn parse_form_date(field: &str, value: Option<&str>) -> Result<NaiveDate, AppError> {
    let raw = value.unwrap_or_default().trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::bad_request(&format!("Invalid {}: {} (expected YYYY-MM-DD)", field, raw))
    })
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "on" | "yes")
    )
}

/// GET /api/items - List all items, newest first
pub async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Item>>, AppError> {
    let items = state.db.list_items()?;
    Ok(Json(items))
}

/// POST /api/items - Create an item
///
/// Expects multipart form with:
/// - name, location, purchase_date, best_by_date (required)
/// - brand, price, spoiled (optional)
/// - image: image file (optional, max 5MB)
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ItemWriteResponse>, AppError> {
    let form = ItemForm::read(multipart).await?;
    let mut new_item = form.to_new_item()?;

    if let Some(image) = &form.image {
        let path = state
            .uploads
            .save(image.filename.as_deref(), &image.bytes)
            .await?;
        new_item.image_path = Some(path);
    }

    let id = match state.db.create_item(&new_item) {
        Ok(id) => id,
        Err(e) => {
            // Don't leave an orphaned upload behind
            if let Some(path) = &new_item.image_path {
                state.uploads.remove(path).await;
            }
            return Err(AppError::from_core(e));
        }
    };

    info!(id, name = %new_item.name, "Item created");
    hooks::after_item_write(&state.db, &new_item);

    Ok(Json(ItemWriteResponse {
        id,
        image_path: new_item.image_path,
    }))
}

/// PUT /api/items/:id - Update an item
///
/// Same form as create, plus `delete_image=true` to drop the current image
/// without replacing it. A new image replaces the old one.
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ItemWriteResponse>, AppError> {
    let form = ItemForm::read(multipart).await?;
    let mut new_item = form.to_new_item()?;

    let existing = state
        .db
        .get_item(id)?
        .ok_or_else(|| AppError::not_found("Item not found"))?;

    let uploaded = match &form.image {
        Some(image) => Some(
            state
                .uploads
                .save(image.filename.as_deref(), &image.bytes)
                .await?,
        ),
        None => None,
    };

    new_item.image_path = match &uploaded {
        Some(path) => Some(path.clone()),
        None if parse_flag(form.delete_image.as_deref()) => None,
        None => existing.image_path.clone(),
    };

    let updated = match state.db.update_item(id, &new_item) {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(path) = &uploaded {
                state.uploads.remove(path).await;
            }
            return Err(AppError::from_core(e));
        }
    };

    if !updated {
        // Deleted between the lookup and the write
        if let Some(path) = &uploaded {
            state.uploads.remove(path).await;
        }
        return Err(AppError::not_found("Item not found"));
    }

    // Superseded image goes only after the new row is committed
    if let Some(old) = &existing.image_path {
        if new_item.image_path.as_ref() != Some(old) {
            state.uploads.remove(old).await;
        }
    }

    info!(id, name = %new_item.name, "Item updated");
    hooks::after_item_write(&state.db, &new_item);

    Ok(Json(ItemWriteResponse {
        id,
        image_path: new_item.image_path,
    }))
}

/// DELETE /api/items/:id - Delete an item and its reminders
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    let item = state
        .db
        .delete_item(id)?
        .ok_or_else(|| AppError::not_found("Item not found"))?;

    if let Some(path) = &item.image_path {
        state.uploads.remove(path).await;
    }

    info!(id, name = %item.name, "Item deleted");

    Ok(Json(SuccessResponse { success: true }))
}
