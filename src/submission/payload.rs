use crate::api::multipart::MultipartPayload;
use crate::form::config::CategoryConfig;
use crate::form::field::{Field, FieldKind};
use crate::form::mode::FormMode;
use crate::form::snapshot::{FormSnapshot, MediaItem, MediaKind};
use crate::form::validation::{parse_float, parse_integer};

/// Build the multipart body for a create or update request.
///
/// Visible non-empty fields go out under their backend names, numbers
/// normalized. New files are indexed per kind (`images[0]`), kept media is
/// referenced by id and removed media is listed in `media_to_delete`.
pub fn build_payload(snapshot: &FormSnapshot, config: &CategoryConfig, mode: &FormMode) -> MultipartPayload {
    let mut payload = MultipartPayload::new();

    for field in config.visible_fields() {
        let value = snapshot.value(field);
        if value.is_empty() {
            continue;
        }
        payload.text(field.backend_name(), wire_value(field, value));
    }

    if let Some(subcategory_id) = config.subcategory_id {
        payload.text("subcategory_id", subcategory_id.to_string());
    }
    if let Some(record_id) = mode.record_id() {
        payload.text("action_id", record_id);
    }

    for kind in [MediaKind::Image, MediaKind::Video] {
        let mut new_index = 0;
        let mut existing_index = 0;
        for item in snapshot.media.items(kind) {
            match item {
                MediaItem::New(file) => {
                    payload.file(
                        format!("{}[{}]", kind.part_name(), new_index),
                        file.file_name.clone(),
                        file.mime_type.clone(),
                        file.bytes.clone(),
                    );
                    new_index += 1;
                }
                MediaItem::Existing { id, .. } => {
                    payload.text(format!("{}[{}]", kind.existing_part_name(), existing_index), id.clone());
                    existing_index += 1;
                }
            }
        }
    }

    if !snapshot.media.removed.is_empty() {
        payload.text("media_to_delete", snapshot.media.removed.join(","));
    }

    payload
}

fn wire_value(field: Field, value: &str) -> String {
    match field.kind() {
        FieldKind::Float => parse_float(value).map(|v| v.to_string()),
        FieldKind::Integer => parse_integer(value).map(|v| v.to_string()),
        _ => None,
    }
    .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::snapshot::MediaFile;

    fn snapshot() -> FormSnapshot {
        let mut snapshot = FormSnapshot::new();
        snapshot.set(Field::Title, "Corner plot");
        snapshot.set(Field::Price, " 250000.50 ");
        snapshot.set(Field::State, "7");
        snapshot.set(Field::Length, "050");
        snapshot.set(Field::Bhk, "3");
        snapshot
    }

    #[test]
    fn test_fields_use_backend_names() {
        let config = CategoryConfig::resolve("lands-plots", None);
        let payload = build_payload(&snapshot(), &config, &FormMode::Create);

        assert_eq!(payload.text_value("title"), Some("Corner plot"));
        assert_eq!(payload.text_value("price"), Some("250000.5"));
        assert_eq!(payload.text_value("state_id"), Some("7"));
        assert_eq!(payload.text_value("length"), Some("50"));
        assert_eq!(payload.text_value("subcategory_id"), Some("3"));
        // hidden for lands-plots
        assert!(!payload.contains("bhk"));
        assert!(!payload.contains("action_id"));
    }

    #[test]
    fn test_edit_mode_adds_action_id() {
        let config = CategoryConfig::resolve("lands-plots", None);
        let mode = FormMode::Edit {
            record_id: "991".into(),
        };
        let payload = build_payload(&snapshot(), &config, &mode);
        assert_eq!(payload.text_value("action_id"), Some("991"));
    }

    #[test]
    fn test_media_parts() {
        let config = CategoryConfig::resolve("lands-plots", None);
        let mut snapshot = snapshot();
        snapshot.media.add_existing(MediaKind::Image, "11", None);
        snapshot.media.add_existing(MediaKind::Image, "12", None);
        snapshot.media.add(MediaFile::new("a.jpg", "image/jpeg", vec![1, 2, 3]));
        snapshot.media.add(MediaFile::new("b.png", "image/png", vec![4]));
        snapshot.media.add(MediaFile::new("tour.mp4", "video/mp4", vec![5, 6]));
        snapshot.media.remove_existing("11");
        snapshot.media.removed.push("40".into());

        let payload = build_payload(&snapshot, &config, &FormMode::Create);
        assert!(payload.contains("images[0]"));
        assert!(payload.contains("images[1]"));
        assert!(payload.contains("videos[0]"));
        assert_eq!(payload.text_value("existing_images[0]"), Some("12"));
        assert!(!payload.contains("existing_images[1]"));
        assert_eq!(payload.text_value("media_to_delete"), Some("11,40"));
        assert_eq!(payload.file_bytes(), 6);
    }
}
