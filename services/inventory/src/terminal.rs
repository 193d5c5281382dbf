//! Text front end for the screen controller
//!
//! Each screen is drawn as a small block of text. Forms become line prompts
//! and popups wait for Enter. End of input or `q` on the menus quits, which
//! stands in for closing the window.

use std::io::{BufRead, Write};
use tracing::debug;

use crate::error::AppResult;
use crate::models::ProductForm;
use crate::screen::{Action, Notice, Screen, ScreenController};

// SGR conceal / reveal, hides the password while it is typed.
const CONCEAL: &str = "\x1b[8m";
const REVEAL: &str = "\x1b[28m";

/// What the current screen asked the controller to do
enum Step {
    Dispatch(Action),
    Redraw,
    Quit,
}

/// Line-oriented renderer over any input/output pair
pub struct Terminal<R, W> {
    input: R,
    output: W,
    mask_input: bool,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            mask_input: false,
        }
    }

    /// Conceal the password field. Only useful on a real terminal.
    pub fn with_masking(mut self, mask_input: bool) -> Self {
        self.mask_input = mask_input;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user quits or input ends
    pub async fn run(&mut self, controller: &mut ScreenController) -> AppResult<()> {
        loop {
            let step = match controller.screen() {
                Screen::LoggedOut => self.login_form()?,
                Screen::MainMenu => self.main_menu()?,
                Screen::AddProductDialog => self.add_product_dialog()?,
                Screen::InventoryView(_) | Screen::LowStockView(_) => {
                    let title = controller.screen().kind().title();
                    let lines = controller.listing_lines();
                    self.popup(title, &lines)?
                }
            };

            let action = match step {
                Step::Dispatch(action) => action,
                Step::Redraw => continue,
                Step::Quit => {
                    debug!("Front end closed");
                    return Ok(());
                }
            };

            if let Some(notice) = controller.dispatch(action).await? {
                self.notice(&notice)?;
            }
        }
    }

    fn login_form(&mut self) -> AppResult<Step> {
        self.heading("Inventory Management System")?;
        writeln!(self.output, "(Ctrl-D to quit)")?;

        // Only end of input quits; every typed username is submitted
        let Some(username) = self.prompt("Username: ")? else {
            return Ok(Step::Quit);
        };
        let Some(password) = self.secret_prompt("Password: ")? else {
            return Ok(Step::Quit);
        };

        Ok(Step::Dispatch(Action::Login { username, password }))
    }

    fn main_menu(&mut self) -> AppResult<Step> {
        self.heading("Main Menu")?;
        writeln!(self.output, "  1) Add Product")?;
        writeln!(self.output, "  2) View Inventory")?;
        writeln!(self.output, "  3) Low Stock Alerts")?;
        writeln!(self.output, "  q) Quit")?;

        let Some(choice) = self.prompt("> ")? else {
            return Ok(Step::Quit);
        };
        let step = match choice.trim() {
            "1" => Step::Dispatch(Action::OpenAddProduct),
            "2" => Step::Dispatch(Action::ViewInventory),
            "3" => Step::Dispatch(Action::ViewLowStock),
            "q" | "Q" => Step::Quit,
            other => {
                writeln!(self.output, "Unknown option: {}", other)?;
                Step::Redraw
            }
        };
        Ok(step)
    }

    fn add_product_dialog(&mut self) -> AppResult<Step> {
        self.heading("Add Product")?;

        let Some(name) = self.prompt("Product Name: ")? else {
            return Ok(Step::Quit);
        };
        let Some(quantity) = self.prompt("Quantity: ")? else {
            return Ok(Step::Quit);
        };
        let Some(price) = self.prompt("Price: ")? else {
            return Ok(Step::Quit);
        };
        let Some(confirm) = self.prompt("Save Product? [Y/n] ")? else {
            return Ok(Step::Quit);
        };

        let action = match confirm.trim() {
            "n" | "N" => Action::Cancel,
            _ => Action::SaveProduct(ProductForm::new(name, quantity, price)),
        };
        Ok(Step::Dispatch(action))
    }

    fn popup(&mut self, title: &str, lines: &[String]) -> AppResult<Step> {
        self.heading(title)?;
        for line in lines {
            writeln!(self.output, "{}", line)?;
        }
        match self.prompt("[press Enter]")? {
            Some(_) => Ok(Step::Dispatch(Action::Acknowledge)),
            None => Ok(Step::Quit),
        }
    }

    fn notice(&mut self, notice: &Notice) -> AppResult<()> {
        let marker = match notice {
            Notice::Error { .. } => "!",
            Notice::Info { .. } => "i",
        };
        writeln!(self.output)?;
        writeln!(self.output, "[{}] {}: {}", marker, notice.title(), notice.message())?;
        // End of input here still lets the caller redraw and then quit.
        self.prompt("[press Enter]")?;
        Ok(())
    }

    fn heading(&mut self, title: &str) -> AppResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== {} ===", title)?;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> AppResult<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Prompt for one line without echoing it when masking is on.
    ///
    /// `None` means the input ended before a line was read.
    pub fn read_secret(&mut self, label: &str) -> AppResult<Option<String>> {
        let secret = self.secret_prompt(label)?;
        if self.mask_input {
            writeln!(self.output)?;
        }
        Ok(secret)
    }

    fn secret_prompt(&mut self, label: &str) -> AppResult<Option<String>> {
        if !self.mask_input {
            return self.prompt(label);
        }
        write!(self.output, "{}{}", label, CONCEAL)?;
        self.output.flush()?;
        let line = self.read_line();
        write!(self.output, "{}", REVEAL)?;
        self.output.flush()?;
        line
    }

    fn read_line(&mut self) -> AppResult<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewProduct;
    use crate::repositories::test_support::memory_pool;
    use crate::repositories::{ProductRepository, UserRepository};
    use std::io::Cursor;

    async fn controller() -> (ScreenController, ProductRepository) {
        let pool = memory_pool().await;
        let users = UserRepository::new(pool.clone());
        users.register("alice", "secret").await.unwrap();
        let products = ProductRepository::new(pool);
        (
            ScreenController::new(users, products.clone(), 5),
            products,
        )
    }

    async fn run_script(controller: &mut ScreenController, script: &str) -> String {
        let mut terminal = Terminal::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        terminal.run(controller).await.unwrap();
        String::from_utf8(terminal.into_output()).unwrap()
    }

    #[tokio::test]
    async fn failed_login_shows_error_and_retries() {
        let (mut controller, _) = controller().await;
        let output = run_script(&mut controller, "alice\nwrong\n\nalice\nsecret\nq\n").await;

        assert!(output.contains("[!] Login Error: Invalid username or password"));
        assert!(output.contains("=== Main Menu ==="));
        assert_eq!(controller.screen(), &Screen::MainMenu);
    }

    #[tokio::test]
    async fn quit_from_login() {
        let (mut controller, _) = controller().await;
        let output = run_script(&mut controller, "").await;

        assert!(output.contains("=== Inventory Management System ==="));
        assert!(output.contains("(Ctrl-D to quit)"));
        assert_eq!(controller.screen(), &Screen::LoggedOut);
    }

    #[tokio::test]
    async fn user_named_q_can_log_in() {
        let pool = memory_pool().await;
        let users = UserRepository::new(pool.clone());
        users.register("q", "secret").await.unwrap();
        let mut controller = ScreenController::new(users, ProductRepository::new(pool), 5);

        let output = run_script(&mut controller, "q\nsecret\n").await;

        assert!(output.contains("=== Main Menu ==="));
        assert!(!output.contains("Login Error"));
        assert_eq!(controller.screen(), &Screen::MainMenu);
    }

    #[test]
    fn read_secret_reads_one_line() {
        let mut terminal = Terminal::new(Cursor::new(b"hunter2\nrest\n".to_vec()), Vec::new());
        assert_eq!(
            terminal.read_secret("Password: ").unwrap().as_deref(),
            Some("hunter2")
        );
        assert_eq!(String::from_utf8(terminal.into_output()).unwrap(), "Password: ");
    }

    #[test]
    fn read_secret_masks_and_ends_line() {
        let mut terminal =
            Terminal::new(Cursor::new(b"hunter2\n".to_vec()), Vec::new()).with_masking(true);
        terminal.read_secret("Password: ").unwrap();
        let output = String::from_utf8(terminal.into_output()).unwrap();

        assert_eq!(output, format!("Password: {}{}\n", CONCEAL, REVEAL));
        assert!(!output.contains("hunter2"));
    }

    #[test]
    fn read_secret_reports_end_of_input() {
        let mut terminal = Terminal::new(Cursor::new(Vec::new()), Vec::new());
        assert_eq!(terminal.read_secret("Password: ").unwrap(), None);
    }

    #[tokio::test]
    async fn end_of_input_quits() {
        let (mut controller, _) = controller().await;
        run_script(&mut controller, "alice\n").await;
        assert_eq!(controller.screen(), &Screen::LoggedOut);
    }

    #[tokio::test]
    async fn add_product_then_view_inventory() {
        let (mut controller, products) = controller().await;
        let output = run_script(
            &mut controller,
            "alice\nsecret\n1\nWidget\n10\n2.50\n\n\n2\n\nq\n",
        )
        .await;

        assert!(output.contains("[i] Success: Product added successfully!"));
        assert!(output.contains("=== Inventory ==="));
        assert!(output.contains("Widget - 10 in stock - $2.50"));

        let all = products.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].quantity, 10);
    }

    #[tokio::test]
    async fn invalid_quantity_reprompts_dialog() {
        let (mut controller, products) = controller().await;
        let output = run_script(
            &mut controller,
            "alice\nsecret\n1\nWidget\nten\n2.50\ny\n\nWidget\n10\n2.50\ny\n\nq\n",
        )
        .await;

        assert!(output.contains("[!] Invalid Input: Quantity must be a whole number"));
        assert_eq!(output.matches("=== Add Product ===").count(), 2);
        assert_eq!(products.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancel_discards_dialog() {
        let (mut controller, products) = controller().await;
        run_script(&mut controller, "alice\nsecret\n1\nWidget\n10\n2.50\nn\nq\n").await;

        assert!(products.list_all().await.unwrap().is_empty());
        assert_eq!(controller.screen(), &Screen::MainMenu);
    }

    #[tokio::test]
    async fn low_stock_popup_lists_only_low_items() {
        let (mut controller, products) = controller().await;
        products
            .add(&NewProduct::new("Widget", 10, 2.50))
            .await
            .unwrap();
        products
            .add(&NewProduct::new("Gadget", 3, 9.99))
            .await
            .unwrap();

        let output = run_script(&mut controller, "alice\nsecret\n3\n\nq\n").await;

        assert!(output.contains("=== Low Stock Alert ==="));
        assert!(output.contains("Gadget - 3 in stock - $9.99"));
        assert!(!output.contains("Widget - 10 in stock"));
    }

    #[tokio::test]
    async fn unknown_menu_option_redraws() {
        let (mut controller, _) = controller().await;
        let output = run_script(&mut controller, "alice\nsecret\n7\nq\n").await;

        assert!(output.contains("Unknown option: 7"));
        assert_eq!(output.matches("=== Main Menu ===").count(), 2);
    }

    #[tokio::test]
    async fn masking_wraps_password_prompt() {
        let (mut controller, _) = controller().await;
        let mut terminal = Terminal::new(Cursor::new(b"alice\nsecret\nq\n".to_vec()), Vec::new())
            .with_masking(true);
        terminal.run(&mut controller).await.unwrap();
        let output = String::from_utf8(terminal.into_output()).unwrap();

        assert!(output.contains(&format!("Password: {}", CONCEAL)));
        assert!(output.contains(REVEAL));
    }
}
