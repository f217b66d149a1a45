//! Photo staging through the listing form.

use crate::constants::MAX_PHOTO_BYTES;
use crate::listing::{LISTING_SUCCESS_NOTICE, ListingForm};
use crate::model::Product;
use crate::photo::{MemoryPreviews, PhotoFile, PhotoStager, StagingError, StagingLimits};

fn listing() -> (ListingForm<MemoryPreviews>, MemoryPreviews) {
    let previews = MemoryPreviews::new();
    let stager = PhotoStager::with_limits(
        previews.clone(),
        StagingLimits {
            max_bytes: MAX_PHOTO_BYTES,
            max_photos: Some(4),
        },
    );
    (ListingForm::new(stager), previews)
}

fn photo(name: &str, size: usize) -> PhotoFile<Vec<u8>> {
    PhotoFile::new(name, "image/jpeg", vec![0; size])
}

#[test]
fn test_stage_unstage_then_submit() {
    let (mut form, previews) = listing();
    form.name = "Chair".to_string();
    form.description = "Oak chair".to_string();
    form.price = "120".to_string();
    form.category_id = Some(3);

    form.photos_mut()
        .stage(vec![photo("a.jpg", 10), photo("b.jpg", 20), photo("c.jpg", 30)])
        .unwrap();
    let removed = form.photos_mut().unstage(1).unwrap();
    assert_eq!(removed.name, "b.jpg");
    assert_eq!(previews.stats().live(), 2);

    let request = form.prepare().unwrap();
    assert_eq!(request.image.as_ref().map(|p| p.name.as_str()), Some("a.jpg"));
    assert_eq!(request.images.len(), 1);
    assert_eq!(request.images[0].name, "c.jpg");

    form.finish(&Ok(Product::new(31, "Chair", 120.0)));
    assert!(form.photos().is_empty());
    assert_eq!(previews.stats().acquired, 3);
    assert_eq!(previews.stats().released, 3);
    assert_eq!(form.notices().current().unwrap().message, LISTING_SUCCESS_NOTICE);
}

#[test]
fn test_rejected_selection_keeps_staged_photos() {
    let (mut form, previews) = listing();
    form.photos_mut().stage(vec![photo("a.jpg", 10)]).unwrap();

    let oversized = photo("big.jpg", (MAX_PHOTO_BYTES + 1) as usize);
    let err = form
        .photos_mut()
        .stage(vec![photo("b.jpg", 10), oversized])
        .unwrap_err();
    assert!(matches!(err, StagingError::TooLarge { .. }));

    let err = form
        .photos_mut()
        .stage(vec![PhotoFile::new("notes.txt", "text/plain", vec![1])])
        .unwrap_err();
    assert!(matches!(err, StagingError::NotAnImage { .. }));

    assert_eq!(form.photos().len(), 1);
    assert_eq!(previews.stats().live(), 1);
}

#[test]
fn test_photo_limit() {
    let (mut form, _) = listing();
    form.photos_mut()
        .stage((0..4).map(|i| photo(&format!("{}.jpg", i), 1)).collect())
        .unwrap();

    let err = form.photos_mut().stage(vec![photo("extra.jpg", 1)]).unwrap_err();
    assert!(matches!(err, StagingError::TooMany { limit: 4 }));
}

#[test]
fn test_dropping_form_releases_every_preview() {
    let (mut form, previews) = listing();
    form.photos_mut()
        .stage(vec![photo("a.jpg", 1), photo("b.jpg", 1)])
        .unwrap();
    form.photos_mut().unstage(0);
    form.photos_mut().stage(vec![photo("c.jpg", 1)]).unwrap();

    drop(form);
    assert_eq!(previews.stats().acquired, 3);
    assert_eq!(previews.stats().live(), 0);
}
