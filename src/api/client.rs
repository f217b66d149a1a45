//! HTTP client for the storefront REST API.
//!
//! Handles login/registration, catalog reads and multipart product creation.
//! The auth token lives in persistent storage and is attached to every request
//! once present.

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::error::ApiError;
use super::images::resolve_image_url;
use crate::constants::TOKEN_KEY;
use crate::model::{Category, Product};
use crate::storage::TabStorage;

/// How the token is presented in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// `Authorization: Token <token>` (the backend's token authentication)
    #[default]
    Token,
    /// `Authorization: Bearer <token>`
    Bearer,
}

impl AuthScheme {
    /// Header prefix for this scheme.
    pub fn prefix(&self) -> &'static str {
        match self {
            AuthScheme::Token => "Token",
            AuthScheme::Bearer => "Bearer",
        }
    }
}

/// Login form payload.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
}

/// Sign-up form payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    /// Desired username
    pub username: String,
    /// Contact email
    pub email: String,
    /// Password
    pub password: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// An image attached to a product creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPhoto {
    /// File name sent with the part
    pub name: String,
    /// Media type of the part
    pub media_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

/// Multipart payload for creating a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Product name
    pub name: String,
    /// Product description
    pub description: String,
    /// Unit price (> 0)
    pub price: f64,
    /// Units in stock
    pub stock_quantity: u32,
    /// Category identifier
    pub category_id: u32,
    /// Primary image
    pub image: Option<UploadPhoto>,
    /// Additional images
    pub images: Vec<UploadPhoto>,
}

impl NewProduct {
    /// Build the multipart form.
    pub fn to_form(&self) -> Result<Form, ApiError> {
        let mut form = Form::new()
            .text("name", self.name.clone())
            .text("description", self.description.clone())
            .text("price", format!("{:.2}", self.price))
            .text("stock_quantity", self.stock_quantity.to_string())
            .text("category_id", self.category_id.to_string());

        if let Some(image) = &self.image {
            form = form.part("image", photo_part(image)?);
        }
        for image in &self.images {
            form = form.part("images", photo_part(image)?);
        }
        Ok(form)
    }

    /// Total number of attached images.
    pub fn image_count(&self) -> usize {
        usize::from(self.image.is_some()) + self.images.len()
    }
}

fn photo_part(photo: &UploadPhoto) -> Result<Part, ApiError> {
    Ok(Part::bytes(photo.bytes.clone())
        .file_name(photo.name.clone())
        .mime_str(&photo.media_type)?)
}

/// Storefront REST client.
pub struct ApiClient<S> {
    http: Client,
    base: Url,
    scheme: AuthScheme,
    tokens: S,
}

impl<S: TabStorage> ApiClient<S> {
    /// Create a client for `base_url`, persisting the token in `tokens`.
    pub fn new(base_url: &str, scheme: AuthScheme, tokens: S) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url.trim())?;
        // Relative joins replace the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base,
            scheme,
            tokens,
        })
    }

    /// Use a preconfigured HTTP client (timeouts, proxy settings).
    pub fn with_http(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// API base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for an endpoint path relative to the base.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Displayable URL for a product image reference.
    pub fn image_url(&self, reference: Option<&str>) -> String {
        resolve_image_url(&self.base, reference)
    }

    /// Stored auth token, if logged in.
    pub fn token(&self) -> Option<String> {
        match self.tokens.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("Failed to read auth token: {}", e);
                None
            }
        }
    }

    /// Check if a token is stored.
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.token() {
            builder = builder.header(AUTHORIZATION, format!("{} {}", self.scheme.prefix(), token));
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("API call failed with status {}", status);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Log in and store the returned token.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, "login/")?.json(credentials);
        let response: LoginResponse = self.fetch(builder).await?;
        self.tokens.set(TOKEN_KEY, &response.token)?;
        log::info!("Logged in as {}", credentials.username);
        Ok(())
    }

    /// Create an account.
    pub async fn register(&self, account: &NewAccount) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, "register/")?.json(account);
        self.send(builder).await?;
        log::info!("Registered account {}", account.username);
        Ok(())
    }

    /// Forget the stored token.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.tokens.remove(TOKEN_KEY)?;
        log::info!("Logged out");
        Ok(())
    }

    /// Every product.
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.fetch(self.request(Method::GET, "products/")?).await
    }

    /// One product by id.
    pub async fn product(&self, id: u64) -> Result<Product, ApiError> {
        self.fetch(self.request(Method::GET, &format!("products/{}/", id))?)
            .await
    }

    /// Products in the category with the given slug.
    pub async fn products_by_category(&self, slug: &str) -> Result<Vec<Product>, ApiError> {
        let path = format!("products/category/{}/", urlencoding::encode(slug));
        self.fetch(self.request(Method::GET, &path)?).await
    }

    /// Every category.
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.fetch(self.request(Method::GET, "categories/")?).await
    }

    /// Create a product (requires a token).
    pub async fn add_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let builder = self
            .request(Method::POST, "products/")?
            .multipart(product.to_form()?);
        let created: Product = self.fetch(builder).await?;
        log::info!(
            "Created product {} with {} image(s)",
            created.id,
            product.image_count()
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn client() -> ApiClient<MemoryStorage> {
        ApiClient::new(
            "https://shop.example.com/api",
            AuthScheme::Token,
            MemoryStorage::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_base_gets_trailing_slash() {
        let client = client();
        assert_eq!(client.base().as_str(), "https://shop.example.com/api/");
        assert_eq!(
            client.endpoint("products/7/").unwrap().as_str(),
            "https://shop.example.com/api/products/7/"
        );
        assert_eq!(
            client.endpoint("/categories/").unwrap().as_str(),
            "https://shop.example.com/api/categories/"
        );
    }

    #[test]
    fn test_invalid_base_rejected() {
        let result = ApiClient::new("not a url", AuthScheme::Token, MemoryStorage::new());
        assert!(matches!(result, Err(ApiError::Url(_))));
    }

    #[test]
    fn test_no_auth_header_without_token() {
        let client = client();
        let request = client
            .request(Method::GET, "products/")
            .unwrap()
            .build()
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_token_header_attached() {
        let client = client();
        client.tokens.set(TOKEN_KEY, "abc123").unwrap();
        assert!(client.is_logged_in());

        let request = client
            .request(Method::GET, "products/")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Token abc123");
    }

    #[test]
    fn test_bearer_scheme() {
        let tokens = MemoryStorage::new();
        tokens.set(TOKEN_KEY, "abc123").unwrap();
        let client = ApiClient::new("https://shop.example.com/api/", AuthScheme::Bearer, tokens)
            .unwrap();

        let request = client
            .request(Method::POST, "products/")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer abc123");
    }

    #[test]
    fn test_logout_removes_token() {
        let client = client();
        client.tokens.set(TOKEN_KEY, "abc123").unwrap();
        client.logout().unwrap();
        assert!(!client.is_logged_in());
    }

    #[test]
    fn test_product_multipart_content_type() {
        let client = client();
        let product = NewProduct {
            name: "Lamp".to_string(),
            description: "Brass desk lamp".to_string(),
            price: 19.99,
            stock_quantity: 3,
            category_id: 2,
            image: Some(UploadPhoto {
                name: "lamp.png".to_string(),
                media_type: "image/png".to_string(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            }),
            images: Vec::new(),
        };
        assert_eq!(product.image_count(), 1);

        let request = client
            .request(Method::POST, "products/")
            .unwrap()
            .multipart(product.to_form().unwrap())
            .build()
            .unwrap();
        let content_type = request.headers()[reqwest::header::CONTENT_TYPE]
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn test_bad_media_type_rejected() {
        let photo = UploadPhoto {
            name: "x".to_string(),
            media_type: "not a mime".to_string(),
            bytes: Vec::new(),
        };
        assert!(photo_part(&photo).is_err());
    }

    #[test]
    fn test_auth_scheme_serde() {
        let scheme: AuthScheme = serde_json::from_str("\"bearer\"").unwrap();
        assert_eq!(scheme, AuthScheme::Bearer);
    }
}
