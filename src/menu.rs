//! Interactive numbered menu.
//!
//! The menu is a small state machine: [`Menu::step`] reads one choice for the
//! current [`MenuState`], performs it and returns the next state. Input and
//! output are generic so the whole flow runs against in-memory buffers.
//!
//! Failed actions and malformed input are reported to the user and leave the
//! menu in its current state; only "exit" or end of input stops the loop.

use crate::chart::{self, PriceChart};
use crate::config;
use crate::error::{CoinwatchError, Result};
use crate::models::PriceRecord;
use crate::Tracker;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Main,
    ViewPrices,
    Favorites,
    Exit,
}

const MAIN_MENU: &str = "
menu :
           1. Add Cryptocurrency
           2. View Cryptocurrency Prices
           3. Chart of changes in the price of a cryptocurrency
           4. Favorite list
           5. Checking the daily chart and comparing cryptocurrencies
           6. Exit
";

const VIEW_MENU: &str = "
Sub Menu:
            1. View Cryptocurrency Prices
            2. Back
";

const FAVORITES_MENU: &str = "
Operations on Favorite list :
                1. Add Favorite Cryptocurrency
                2. Remove Favorite Cryptocurrency
                3. View Favorite Cryptocurrencies
                4. Back
";

pub struct Menu<R, W> {
    tracker: Tracker,
    input: R,
    output: W,
    state: MenuState,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    /// A menu in [`MenuState::Main`] reading from `input`.
    pub fn new(tracker: Tracker, input: R, output: W) -> Self {
        Self {
            tracker,
            input,
            output,
            state: MenuState::Main,
        }
    }

    /// The screen the next [`step`](Self::step) will handle.
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// The tracker the menu drives.
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Everything written so far, for writers that keep it.
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        while self.state != MenuState::Exit {
            self.step()?;
        }
        Ok(())
    }

    /// Perform one read-eval cycle and return the new state.
    pub fn step(&mut self) -> Result<MenuState> {
        let next = match self.state {
            MenuState::Main => self.main_menu()?,
            MenuState::ViewPrices => self.view_menu()?,
            MenuState::Favorites => self.favorites_menu()?,
            MenuState::Exit => MenuState::Exit,
        };
        self.state = next;
        Ok(next)
    }

    // -- I/O helpers -------------------------------------------------------

    /// Print `prompt` and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, message: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", message.as_ref())?;
        Ok(())
    }

    fn list_coins(&mut self) -> Result<()> {
        let lines: Vec<String> = self
            .tracker
            .registry()
            .coins()
            .iter()
            .enumerate()
            .map(|(i, coin)| format!("           {} - {}", i + 1, coin))
            .collect();
        for line in lines {
            self.say(line)?;
        }
        Ok(())
    }

    /// List the registry and read a comma-separated selection.
    fn select_coins(&mut self) -> Result<Option<Vec<String>>> {
        if self.tracker.registry().is_empty() {
            self.say("\nNo cryptocurrencies added yet.")?;
            return Ok(None);
        }
        self.list_coins()?;
        let Some(answer) =
            self.prompt("Please enter the numbers of cryptoes (separated with ','): ")?
        else {
            return Ok(None);
        };
        match parse_indices(&answer, self.tracker.registry().len()) {
            Ok(indices) => Ok(Some(self.coins_at(&indices))),
            Err(e) => {
                self.say(format!("\n{e}"))?;
                Ok(None)
            }
        }
    }

    fn coins_at(&self, indices: &[usize]) -> Vec<String> {
        let registry = self.tracker.registry();
        indices
            .iter()
            .filter_map(|&i| registry.get(i).map(str::to_string))
            .collect()
    }

    // -- Main menu ---------------------------------------------------------

    fn main_menu(&mut self) -> Result<MenuState> {
        self.say(MAIN_MENU)?;
        let Some(choice) = self.prompt("Please enter the operation number: ")? else {
            return Ok(MenuState::Exit);
        };
        match choice.as_str() {
            "1" => self.add_coin()?,
            "2" => return Ok(MenuState::ViewPrices),
            "3" => self.chart_history()?,
            "4" => return Ok(MenuState::Favorites),
            "5" => self.compare_daily()?,
            "6" => {
                self.say("Exit.")?;
                return Ok(MenuState::Exit);
            }
            _ => self.say("Invalid operation!")?,
        }
        Ok(MenuState::Main)
    }

    fn add_coin(&mut self) -> Result<()> {
        let Some(coin) = self.prompt("\nEnter the name of the cryptocurrency: ")? else {
            return Ok(());
        };
        if self.tracker.registry().exists(&coin) {
            return self.say(format!("\n{coin} has already been added to the list."));
        }
        match self.tracker.add_coin(&coin) {
            Ok(()) => self.say(format!(
                "\nThe cryptocurrency '{coin}' has been added successfully."
            )),
            Err(CoinwatchError::UnknownCoin(_)) => {
                self.say(format!("\nThe cryptocurrency '{coin}' does not exist."))
            }
            Err(e) => self.say(format!(
                "\nAn error occurred while making the API request: {e}"
            )),
        }
    }

    fn chart_history(&mut self) -> Result<()> {
        if self.tracker.registry().is_empty() {
            return self.say("\nNo cryptocurrencies added yet.");
        }
        self.list_coins()?;
        let Some(answer) = self.prompt("Please enter the numbers of crypto: ")? else {
            return Ok(());
        };
        let index = match parse_index(&answer, self.tracker.registry().len()) {
            Ok(index) => index,
            Err(e) => return self.say(format!("\n{e}")),
        };
        let Some(coin) = self.tracker.registry().get(index).map(str::to_string) else {
            return Ok(());
        };

        let history = match self.tracker.history(&coin) {
            Ok(history) => history,
            Err(e) => return self.say(format!("\nUnable to read price history: {e}")),
        };
        if history.is_empty() {
            return self.say(format!("No data available for cryptocurrency '{coin}'."));
        }

        let chart = PriceChart::from_history(
            format!("Price of {coin} Over Time"),
            &history,
        );
        let mut sorted = history;
        sorted.sort_by_key(PriceRecord::timestamp);
        self.say(price_table(&sorted))?;
        match chart::render(&chart, config::CHART_WIDTH, config::CHART_HEIGHT) {
            Ok(text) => self.say(text),
            Err(e) => self.say(format!("\n{e}")),
        }
    }

    fn compare_daily(&mut self) -> Result<()> {
        let Some(coins) = self.select_coins()? else {
            return Ok(());
        };
        let Some(answer) = self.prompt("Please enter the number of days: ")? else {
            return Ok(());
        };
        let days = match parse_days(&answer) {
            Ok(days) => days,
            Err(e) => return self.say(format!("\n{e}")),
        };

        let comparison = match self.tracker.compare(&coins, days) {
            Ok(comparison) => comparison,
            Err(CoinwatchError::NoData(_)) => {
                return self.say(
                    "\nUnable to fetch data for the selected cryptocurrencies. \
                     Please try again later.",
                );
            }
            Err(e) => return self.say(format!("\nUnable to compare cryptocurrencies: {e}")),
        };
        for coin in &comparison.skipped {
            self.say(format!(
                "Unable to fetch data for {coin}. Please try again later."
            ))?;
        }

        let charts: Vec<PriceChart> = comparison
            .series
            .iter()
            .map(|(coin, series)| PriceChart::from_daily(format!("{coin} Daily Price Chart"), series))
            .collect();
        match chart::render_grid(
            &charts,
            config::GRID_COLUMNS,
            config::GRID_CELL_WIDTH,
            config::GRID_CELL_HEIGHT,
        ) {
            Ok(text) => self.say(text)?,
            Err(e) => self.say(format!("\n{e}"))?,
        }

        for score in &comparison.scores {
            self.say(format!(
                "{}: summed daily change {:+.4}",
                score.coin, score.change
            ))?;
        }
        if let Some(best) = comparison.best() {
            self.say(format!(
                "\nBest cryptocurrency over {days} days: {} ({:+.4})",
                best.coin, best.change
            ))?;
        }
        Ok(())
    }

    // -- View prices submenu ----------------------------------------------

    fn view_menu(&mut self) -> Result<MenuState> {
        self.say(VIEW_MENU)?;
        let Some(choice) = self.prompt("\nPlease enter your choice: ")? else {
            return Ok(MenuState::Exit);
        };
        match choice.as_str() {
            "1" => self.view_prices()?,
            "2" => return Ok(MenuState::Main),
            _ => self.say("Invalid choice!")?,
        }
        Ok(MenuState::ViewPrices)
    }

    fn view_prices(&mut self) -> Result<()> {
        let Some(coins) = self.select_coins()? else {
            return Ok(());
        };
        let update = self.tracker.fetch_current_prices(&coins);
        self.say("\nCrypto Prices:")?;
        self.say(price_table(&update.prices.records))?;
        for coin in &update.prices.failed {
            self.say(format!("Unable to fetch the current price of {coin}."))?;
        }
        match update.stored {
            Ok(0) => Ok(()),
            Ok(_) => {
                let path = self.tracker.store().prices_path().display().to_string();
                self.say(format!("\nData appended to {path}"))
            }
            Err(e) => self.say(format!("\nUnable to save prices: {e}")),
        }
    }

    // -- Favorites submenu -------------------------------------------------

    fn favorites_menu(&mut self) -> Result<MenuState> {
        self.say(FAVORITES_MENU)?;
        let Some(choice) = self.prompt("Please enter the operation number: ")? else {
            return Ok(MenuState::Exit);
        };
        match choice.as_str() {
            "1" => {
                let Some(coin) = self.prompt("\nEnter the name of the cryptocurrency: ")? else {
                    return Ok(MenuState::Exit);
                };
                match self.tracker.add_favorite(&coin) {
                    Ok(()) => self.say(format!(
                        "\nThe cryptocurrency '{coin}' has been added to the favorite list."
                    ))?,
                    Err(CoinwatchError::UnknownCoin(_)) => self.say(format!(
                        "\nThe cryptocurrency '{coin}' does not exist in the cryptocurrency list."
                    ))?,
                    Err(e) => self.say(format!("\nUnable to save favorites: {e}"))?,
                }
            }
            "2" => {
                let Some(coin) = self.prompt("\nEnter the name of the cryptocurrency: ")? else {
                    return Ok(MenuState::Exit);
                };
                match self.tracker.remove_favorite(&coin) {
                    Ok(()) => self.say(format!(
                        "\nThe cryptocurrency '{coin}' has been removed from the favorite list."
                    ))?,
                    Err(e @ CoinwatchError::NotFavorite(_)) => self.say(format!("\n{e}."))?,
                    Err(e) => self.say(format!("\nUnable to save favorites: {e}"))?,
                }
            }
            "3" => {
                self.say("\nFavorite Cryptocurrencies:")?;
                let favorites: Vec<String> = self
                    .tracker
                    .favorites()
                    .list()
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                if favorites.is_empty() {
                    self.say("No cryptocurrencies in the favorite list.")?;
                }
                for coin in favorites {
                    self.say(coin)?;
                }
            }
            "4" => {
                self.say("Back")?;
                return Ok(MenuState::Main);
            }
            _ => self.say("Invalid operation!")?,
        }
        Ok(MenuState::Favorites)
    }
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

/// Parse a 1-based menu number into a 0-based index below `len`.
pub fn parse_index(input: &str, len: usize) -> Result<usize> {
    let n: usize = input
        .trim()
        .parse()
        .map_err(|_| CoinwatchError::InvalidArgument(format!("'{}' is not a number", input.trim())))?;
    if n == 0 || n > len {
        return Err(CoinwatchError::InvalidArgument(format!(
            "{n} is out of range (1-{len})"
        )));
    }
    Ok(n - 1)
}

/// Parse a comma-separated list of 1-based menu numbers.
pub fn parse_indices(input: &str, len: usize) -> Result<Vec<usize>> {
    let indices = input
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse_index(part, len))
        .collect::<Result<Vec<_>>>()?;
    if indices.is_empty() {
        return Err(CoinwatchError::InvalidArgument("no cryptocurrency selected".into()));
    }
    Ok(indices)
}

/// Parse a positive number of days.
pub fn parse_days(input: &str) -> Result<u32> {
    match input.trim().parse::<u32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(CoinwatchError::InvalidArgument(format!(
            "'{}' is not a valid number of days",
            input.trim()
        ))),
    }
}

fn price_table(records: &[PriceRecord]) -> String {
    let mut out = format!(
        "{:<20} {:<8} {:<10} {:<8} {:>16}",
        "Name", "Symbol", "Date", "Time", "Price (USD)"
    );
    for r in records {
        out.push('\n');
        out.push_str(&format!(
            "{:<20} {:<8} {:<10} {:<8} {:>16}",
            r.name,
            r.symbol,
            r.date.format("%Y-%m-%d"),
            r.time.format("%H:%M:%S"),
            r.price_usd
        ));
    }
    out
}
