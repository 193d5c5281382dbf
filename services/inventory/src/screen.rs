//! Screen controller
//!
//! The application is a small state machine. `LoggedOut` is the only entry
//! point; once a login succeeds the user moves between the main menu and
//! three modal screens until the process exits. There is no logout.
//!
//! ```text
//! LoggedOut --login ok--> MainMenu
//! LoggedOut --login failed--> LoggedOut (error notice)
//! MainMenu --open--> AddProductDialog --save/cancel--> MainMenu
//! MainMenu --view--> InventoryView | LowStockView --acknowledge--> MainMenu
//! ```

use std::fmt;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Product, ProductForm};
use crate::repositories::{ProductRepository, UserRepository};

pub const LOGIN_ERROR_TITLE: &str = "Login Error";
pub const LOGIN_ERROR_MESSAGE: &str = "Invalid username or password";
pub const INVALID_INPUT_TITLE: &str = "Invalid Input";
pub const PRODUCT_ADDED_TITLE: &str = "Success";
pub const PRODUCT_ADDED_MESSAGE: &str = "Product added successfully!";

/// Current screen, with the rows shown by the listing views
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    LoggedOut,
    MainMenu,
    AddProductDialog,
    InventoryView(Vec<Product>),
    LowStockView(Vec<Product>),
}

/// Screen without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    LoggedOut,
    MainMenu,
    AddProductDialog,
    InventoryView,
    LowStockView,
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::LoggedOut => ScreenKind::LoggedOut,
            Screen::MainMenu => ScreenKind::MainMenu,
            Screen::AddProductDialog => ScreenKind::AddProductDialog,
            Screen::InventoryView(_) => ScreenKind::InventoryView,
            Screen::LowStockView(_) => ScreenKind::LowStockView,
        }
    }
}

impl ScreenKind {
    /// Window title
    pub fn title(self) -> &'static str {
        match self {
            ScreenKind::LoggedOut => "Inventory Management System",
            ScreenKind::MainMenu => "Main Menu",
            ScreenKind::AddProductDialog => "Add Product",
            ScreenKind::InventoryView => "Inventory",
            ScreenKind::LowStockView => "Low Stock Alert",
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// User input, one variant per button
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Login { username: String, password: String },
    OpenAddProduct,
    SaveProduct(ProductForm),
    Cancel,
    ViewInventory,
    ViewLowStock,
    Acknowledge,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Login { .. } => "Login",
            Action::OpenAddProduct => "Add Product",
            Action::SaveProduct(_) => "Save Product",
            Action::Cancel => "Cancel",
            Action::ViewInventory => "View Inventory",
            Action::ViewLowStock => "Low Stock Alerts",
            Action::Acknowledge => "OK",
        }
    }
}

/// Blocking popup the front end must show before continuing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error { title: String, message: String },
    Info { title: String, message: String },
}

impl Notice {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice::Error {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice::Info {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Notice::Error { title, .. } | Notice::Info { title, .. } => title,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Error { message, .. } | Notice::Info { message, .. } => message,
        }
    }
}

/// Drives screen transitions against the two stores
pub struct ScreenController {
    users: UserRepository,
    products: ProductRepository,
    low_stock_threshold: i64,
    screen: Screen,
}

impl ScreenController {
    /// Start logged out
    pub fn new(
        users: UserRepository,
        products: ProductRepository,
        low_stock_threshold: i64,
    ) -> Self {
        Self {
            users,
            products,
            low_stock_threshold,
            screen: Screen::LoggedOut,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Apply one user action.
    ///
    /// A store failure leaves the screen unchanged. An action the current
    /// screen has no button for is rejected with
    /// [`AppError::InvalidTransition`].
    pub async fn dispatch(&mut self, action: Action) -> AppResult<Option<Notice>> {
        match (self.screen.kind(), action) {
            (ScreenKind::LoggedOut, Action::Login { username, password }) => {
                if self.users.authenticate(&username, &password).await? {
                    info!(%username, "Login succeeded");
                    self.screen = Screen::MainMenu;
                    Ok(None)
                } else {
                    warn!(%username, "Login rejected");
                    Ok(Some(Notice::error(LOGIN_ERROR_TITLE, LOGIN_ERROR_MESSAGE)))
                }
            }
            (ScreenKind::MainMenu, Action::OpenAddProduct) => {
                self.screen = Screen::AddProductDialog;
                Ok(None)
            }
            (ScreenKind::MainMenu, Action::ViewInventory) => {
                let products = self.products.list_all().await?;
                self.screen = Screen::InventoryView(products);
                Ok(None)
            }
            (ScreenKind::MainMenu, Action::ViewLowStock) => {
                let products = self.products.list_below(self.low_stock_threshold).await?;
                self.screen = Screen::LowStockView(products);
                Ok(None)
            }
            (ScreenKind::AddProductDialog, Action::SaveProduct(form)) => match form.parse() {
                Ok(product) => {
                    self.products.add(&product).await?;
                    self.screen = Screen::MainMenu;
                    Ok(Some(Notice::info(PRODUCT_ADDED_TITLE, PRODUCT_ADDED_MESSAGE)))
                }
                Err(e) => {
                    warn!(error = %e, "Add product form rejected");
                    Ok(Some(Notice::error(INVALID_INPUT_TITLE, e.to_string())))
                }
            },
            (ScreenKind::AddProductDialog, Action::Cancel)
            | (ScreenKind::InventoryView | ScreenKind::LowStockView, Action::Acknowledge) => {
                self.screen = Screen::MainMenu;
                Ok(None)
            }
            (screen, action) => Err(AppError::InvalidTransition {
                screen,
                action: action.name(),
            }),
        }
    }

    /// Body text of the listing screens, one product per line
    pub fn listing_lines(&self) -> Vec<String> {
        match &self.screen {
            Screen::InventoryView(products) if products.is_empty() => {
                vec!["No products in inventory.".to_string()]
            }
            Screen::LowStockView(products) if products.is_empty() => {
                vec![format!(
                    "No products below {} in stock.",
                    self.low_stock_threshold
                )]
            }
            Screen::InventoryView(products) | Screen::LowStockView(products) => {
                products.iter().map(ToString::to_string).collect()
            }
            _ => Vec::new(),
        }
    }
}
