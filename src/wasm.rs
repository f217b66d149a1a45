//! Browser bindings.
//!
//! Exposes a [`Storefront`] object to JavaScript. Views call into it on user
//! events; structured data crosses the boundary as JSON strings.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};

use crate::api::{ApiClient, UploadPhoto};
use crate::catalog::{Catalog, CategoryFilter};
use crate::config::StorefrontConfig;
use crate::gallery::CustomerGallery;
use crate::handoff::HandoffStore;
use crate::listing::ListingForm;
use crate::model::Product;
use crate::photo::{ObjectUrlPreviews, PhotoStager, files_from_list};
use crate::registration::{Field, RegistrationFlow, WindowLauncher};
use crate::storage::WebStorage;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let config = StorefrontConfig::load_or_default();
    crate::logging::init(config.log_level);
    log::info!("Storefront client starting");
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

struct Views {
    catalog: Catalog,
    selection: HandoffStore<WebStorage>,
    registration: RegistrationFlow<WebStorage, WindowLauncher>,
    listing: ListingForm<ObjectUrlPreviews>,
    gallery: CustomerGallery<ObjectUrlPreviews, WebStorage>,
}

/// Client state shared by every view of the tab.
#[wasm_bindgen]
pub struct Storefront {
    views: Rc<RefCell<Views>>,
    api: Rc<ApiClient<WebStorage>>,
}

#[wasm_bindgen]
impl Storefront {
    /// Build the client from stored configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Storefront, JsValue> {
        let config = StorefrontConfig::load_or_default();

        let api = ApiClient::new(&config.api_base_url, config.auth_scheme, WebStorage::local().map_err(js_error)?)
            .map_err(js_error)?;
        let registration = RegistrationFlow::new(
            HandoffStore::new(WebStorage::session().map_err(js_error)?),
            WindowLauncher,
            config.handoff_target(),
        )
        .with_notices(config.notice_board());
        let listing = ListingForm::new(PhotoStager::with_limits(
            ObjectUrlPreviews,
            config.staging_limits(),
        ));

        let mut gallery = CustomerGallery::new(
            PhotoStager::with_limits(ObjectUrlPreviews, config.staging_limits()),
            WebStorage::session().map_err(js_error)?,
        );
        *gallery.notices_mut() = config.notice_board();

        let views = Views {
            catalog: Catalog::new(),
            selection: HandoffStore::new(WebStorage::session().map_err(js_error)?),
            registration,
            listing,
            gallery,
        };
        Ok(Storefront {
            views: Rc::new(RefCell::new(views)),
            api: Rc::new(api),
        })
    }

    /// Fetch products (optionally of one category slug) into the catalog.
    /// Resolves to the number of products loaded.
    pub fn load_products(&self, category: Option<String>) -> js_sys::Promise {
        let views = Rc::clone(&self.views);
        let api = Rc::clone(&self.api);
        future_to_promise(async move {
            let filter = category.map_or(CategoryFilter::All, CategoryFilter::Slug);
            let result = match &filter {
                CategoryFilter::All => api.products().await,
                CategoryFilter::Slug(slug) => api.products_by_category(slug).await,
            };
            let products = result.map_err(|e| {
                log::warn!("Failed to load products: {}", e);
                JsValue::from_str(e.user_message())
            })?;
            let count = products.len();
            let mut views = views.borrow_mut();
            views.catalog.set_filter(filter);
            views.catalog.set_products(products);
            Ok(JsValue::from(count as u32))
        })
    }

    /// Fetch categories into the catalog.
    pub fn load_categories(&self) -> js_sys::Promise {
        let views = Rc::clone(&self.views);
        let api = Rc::clone(&self.api);
        future_to_promise(async move {
            let categories = api
                .categories()
                .await
                .map_err(|e| JsValue::from_str(e.user_message()))?;
            let count = categories.len();
            views.borrow_mut().catalog.set_categories(categories);
            Ok(JsValue::from(count as u32))
        })
    }

    /// Update the search box filter.
    pub fn set_search(&self, search: &str) {
        self.views.borrow_mut().catalog.set_search(search);
    }

    /// Products matching the search, as a JSON array.
    pub fn visible_products_json(&self) -> Result<String, JsValue> {
        let views = self.views.borrow();
        serde_json::to_string(&views.catalog.visible_products()).map_err(js_error)
    }

    /// Displayable URL for a product image reference.
    pub fn image_url(&self, reference: Option<String>) -> String {
        self.api.image_url(reference.as_deref())
    }

    /// Select a loaded product for registration.
    pub fn select_product(&self, id: u64) -> Result<bool, JsValue> {
        let views = self.views.borrow();
        views.catalog.select(id, &views.selection).map_err(js_error)
    }

    /// Select a product given as JSON.
    pub fn select_product_json(&self, json: &str) -> Result<(), JsValue> {
        let product: Product = serde_json::from_str(json).map_err(js_error)?;
        self.views
            .borrow()
            .selection
            .set_selected_product(&product)
            .map_err(js_error)
    }

    /// The selected product as JSON, if any.
    pub fn selected_product_json(&self) -> Option<String> {
        let product = self.views.borrow().selection.selected_product()?;
        serde_json::to_string(&product).ok()
    }

    /// Update a registration field by form key.
    pub fn set_registration_field(&self, key: &str, value: &str) -> Result<(), JsValue> {
        let field = Field::from_key(key).ok_or_else(|| js_error(format!("Unknown field '{}'", key)))?;
        self.views
            .borrow_mut()
            .registration
            .set_field(field, value);
        Ok(())
    }

    /// Current value of a registration field.
    pub fn registration_field(&self, key: &str) -> Option<String> {
        let field = Field::from_key(key)?;
        Some(self.views.borrow().registration.form().get(field).to_string())
    }

    /// Error message for a registration field from the last submit.
    pub fn registration_error(&self, key: &str) -> Option<String> {
        let field = Field::from_key(key)?;
        self.views.borrow().registration.error_for(field)
    }

    /// Submit the registration. Returns the opened hand-off link.
    pub fn submit_registration(&self) -> Result<String, JsValue> {
        let mut views = self.views.borrow_mut();
        let receipt = views.registration.submit().map_err(js_error)?;
        Ok(receipt.uri)
    }

    /// The registration log as a JSON array.
    pub fn registrations_json(&self) -> Result<String, JsValue> {
        let records = self.views.borrow().registration.store().registrations();
        serde_json::to_string(&records).map_err(js_error)
    }

    /// Stage photos picked for a new listing.
    pub fn stage_files(&self, files: &web_sys::FileList) -> Result<(), JsValue> {
        let mut views = self.views.borrow_mut();
        views
            .listing
            .photos_mut()
            .stage(files_from_list(files))
            .map(|_| ())
            .map_err(js_error)
    }

    /// Remove a staged listing photo.
    pub fn unstage(&self, index: usize) {
        self.views.borrow_mut().listing.photos_mut().unstage(index);
    }

    /// Preview URLs of the staged listing photos.
    pub fn preview_urls(&self) -> Vec<String> {
        let views = self.views.borrow();
        views
            .listing
            .photos()
            .preview_urls()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Set the listing fields.
    pub fn set_listing(
        &self,
        name: &str,
        description: &str,
        price: &str,
        stock_quantity: &str,
        category_id: Option<u32>,
    ) {
        let mut views = self.views.borrow_mut();
        let listing = &mut views.listing;
        listing.name = name.to_string();
        listing.description = description.to_string();
        listing.price = price.to_string();
        listing.stock_quantity = stock_quantity.to_string();
        listing.category_id = category_id;
    }

    /// Validate and create the listing. Resolves to the new product id.
    pub fn submit_listing(&self) -> js_sys::Promise {
        let views = Rc::clone(&self.views);
        let api = Rc::clone(&self.api);
        future_to_promise(async move {
            let (details, files) = {
                let mut views = views.borrow_mut();
                let details = views.listing.validate().map_err(js_error)?;
                let files: Vec<(String, String, web_sys::File)> = views
                    .listing
                    .photos()
                    .staged()
                    .iter()
                    .map(|p| {
                        let file = p.file();
                        (file.name.clone(), file.media_type.clone(), file.source.clone())
                    })
                    .collect();
                (details, files)
            };

            let mut photos = Vec::with_capacity(files.len());
            for (name, media_type, file) in files {
                let buffer = JsFuture::from(file.array_buffer()).await?;
                photos.push(UploadPhoto {
                    name,
                    media_type,
                    bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
                });
            }

            let outcome = api.add_product(&details.into_new_product(photos)).await;
            views.borrow_mut().listing.finish(&outcome);
            let product = outcome.map_err(|e| JsValue::from_str(e.user_message()))?;
            Ok(JsValue::from(product.id as f64))
        })
    }

    /// Pick the first file of `files` for the customer gallery.
    pub fn select_customer_photo(&self, files: &web_sys::FileList) -> Result<(), JsValue> {
        let Some(file) = files_from_list(files).into_iter().next() else {
            return Ok(());
        };
        self.views.borrow_mut().gallery.select(file).map_err(js_error)
    }

    /// Preview URL of the picked gallery photo.
    pub fn customer_preview_url(&self) -> Option<String> {
        self.views.borrow().gallery.preview_url().map(str::to_string)
    }

    /// Read the picked gallery photo and add it to the gallery.
    /// Resolves to the new photo's id.
    pub fn upload_customer_photo(&self) -> js_sys::Promise {
        let views = Rc::clone(&self.views);
        future_to_promise(async move {
            let file = views.borrow().gallery.selected().map(|p| p.file().source.clone());
            let bytes = match file {
                Some(file) => {
                    let buffer = JsFuture::from(file.array_buffer()).await?;
                    js_sys::Uint8Array::new(&buffer).to_vec()
                }
                None => Vec::new(),
            };
            let photo = views
                .borrow_mut()
                .gallery
                .upload_bytes(&bytes)
                .map_err(js_error)?;
            Ok(JsValue::from(photo.id as f64))
        })
    }

    /// The customer gallery as a JSON array.
    pub fn customer_photos_json(&self) -> Result<String, JsValue> {
        let photos = self.views.borrow().gallery.photos();
        serde_json::to_string(&photos).map_err(js_error)
    }

    /// Text of the live banner, if any. Expired banners are dropped.
    pub fn notice(&self) -> Option<String> {
        let mut views = self.views.borrow_mut();
        views.registration.notices_mut().tick();
        if let Some(notice) = views.registration.notices().current() {
            return Some(notice.message.clone());
        }
        views.gallery.notices_mut().tick();
        if let Some(notice) = views.gallery.notices().current() {
            return Some(notice.message.clone());
        }
        views
            .listing
            .notices()
            .current()
            .map(|n| n.message.clone())
    }

    /// Whether an auth token is stored.
    pub fn is_logged_in(&self) -> bool {
        self.api.is_logged_in()
    }

    /// Log in with username and password.
    pub fn login(&self, username: String, password: String) -> js_sys::Promise {
        let api = Rc::clone(&self.api);
        future_to_promise(async move {
            let credentials = crate::api::Credentials { username, password };
            api.login(&credentials)
                .await
                .map_err(|_| JsValue::from_str("Invalid username or password"))?;
            Ok(JsValue::TRUE)
        })
    }

    /// Create an account.
    pub fn register_account(&self, username: String, email: String, password: String) -> js_sys::Promise {
        let api = Rc::clone(&self.api);
        future_to_promise(async move {
            let account = crate::api::NewAccount {
                username,
                email,
                password,
            };
            api.register(&account)
                .await
                .map_err(|_| JsValue::from_str("Registration failed. Please try again."))?;
            Ok(JsValue::TRUE)
        })
    }

    /// Forget the auth token.
    pub fn logout(&self) -> Result<(), JsValue> {
        self.api.logout().map_err(js_error)
    }
}
