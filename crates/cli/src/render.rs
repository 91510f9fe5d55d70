//! Terminal output for the live table.

use colored::{ColoredString, Colorize};
use std::io::Write;
use swap_monitor_domain::display::format_amount;
use swap_monitor_domain::entities::{Pool, Token};
use swap_monitor_domain::metrics::LiquiditySnapshot;
use swap_monitor_domain::policy::Sentiment;
use swap_monitor_execution::monitor::{RowSink, SwapRow};
use tracing::{info, warn};

const TIME_WIDTH: usize = 10;
const MIN_TYPE_WIDTH: usize = 12;
const AMOUNT_WIDTH: usize = 25;
const RATIO_WIDTH: usize = 52;
const MAKER_WIDTH: usize = 15;

/// Fixed-width, optionally coloured table.
pub struct TableRenderer<W: Write> {
    out: W,
    color: bool,
    show_spot: bool,
    type_width: usize,
    header_printed: bool,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            show_spot: false,
            type_width: MIN_TYPE_WIDTH,
            header_printed: false,
        }
    }

    /// Adds a column with the running spot price.
    #[must_use]
    pub fn with_spot(mut self, show_spot: bool) -> Self {
        self.show_spot = show_spot;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            warn!(error = %e, "Failed to write to terminal");
        }
    }

    fn paint(&self, cell: &str, sentiment: Sentiment) -> ColoredString {
        if !self.color {
            return cell.normal();
        }
        match sentiment {
            Sentiment::Favorable => cell.green(),
            Sentiment::Unfavorable => cell.red(),
            Sentiment::Neutral => cell.yellow(),
        }
    }

    fn header(&self, pool: &Pool) -> String {
        let mut header = format!(
            "{:<time$}{:<kind$}{:>amount$}{:>amount$}  {:<ratio$}{:<maker$}",
            "TIME",
            "TYPE",
            pool.token_a.symbol,
            pool.token_b.symbol,
            "RATIO",
            "MAKER",
            time = TIME_WIDTH,
            kind = self.type_width,
            amount = AMOUNT_WIDTH,
            ratio = RATIO_WIDTH,
            maker = MAKER_WIDTH,
        );
        if self.show_spot {
            header.push_str(&format!("SPOT {}/{}", pool.token_b.symbol, pool.token_a.symbol));
        }
        header.trim_end().to_string()
    }

    fn row(&self, row: &SwapRow) -> String {
        let kind = format!("{:<width$}", row.direction, width = self.type_width);
        let mut line = format!(
            "{:<time$}{}{:>amount$}{:>amount$}  {:<ratio$}{:<maker$}",
            row.time,
            self.paint(&kind, row.sentiment),
            row.amount_a,
            row.amount_b,
            row.ratio,
            row.maker,
            time = TIME_WIDTH,
            amount = AMOUNT_WIDTH,
            ratio = RATIO_WIDTH,
            maker = MAKER_WIDTH,
        );
        if let (true, Some(spot)) = (self.show_spot, &row.spot) {
            line.push_str(spot);
        }
        line.trim_end().to_string()
    }
}

fn token_line(label: &str, token: &Token) -> String {
    format!(
        "{label}: {} ({}) {}, {} decimals",
        token.symbol, token.name, token.address, token.decimals
    )
}

impl<W: Write> RowSink for TableRenderer<W> {
    fn on_connected(&mut self, pool: &Pool, snapshot: Option<&LiquiditySnapshot>) {
        if self.header_printed {
            info!(pool = %pool.address, "Reconnected");
            return;
        }

        let direction_width = pool.token_a.symbol.len() + pool.token_b.symbol.len() + 2;
        self.type_width = MIN_TYPE_WIDTH.max(direction_width + 2);

        self.emit(&format!("Listening for {} swaps at {}", pool.name, pool.address));
        self.emit(&token_line("Token A", &pool.token_a));
        self.emit(&token_line("Token B", &pool.token_b));
        if let Some(snapshot) = snapshot {
            match snapshot.burned_percentage() {
                Ok(burned) => self.emit(&format!("Burned liquidity: {burned}")),
                Err(e) => warn!(error = %e, "Cannot compute burned liquidity"),
            }
            let (reserve_a, reserve_b) = snapshot.reserve_amounts(pool);
            if let (Ok(a), Ok(b)) = (reserve_a.to_decimal(), reserve_b.to_decimal()) {
                self.emit(&format!(
                    "Reserves: {} {} / {} {}",
                    format_amount(a, 2),
                    pool.token_a.symbol,
                    format_amount(b, 2),
                    pool.token_b.symbol
                ));
            }
        }
        let header = self.header(pool);
        self.emit(&header);
        self.header_printed = true;
    }

    fn on_row(&mut self, row: &SwapRow) {
        let line = self.row(row);
        self.emit(&line);
    }

    fn on_disconnected(&mut self, reason: &str) {
        // The listener logs the details; keep the table readable.
        info!(reason, "Feed interrupted, waiting to reconnect");
    }
}

/// One JSON object per swap on stdout.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RowSink for JsonRenderer<W> {
    fn on_connected(&mut self, pool: &Pool, _snapshot: Option<&LiquiditySnapshot>) {
        info!(pool = %pool.address, name = %pool.name, "Streaming swaps as JSON");
    }

    fn on_row(&mut self, row: &SwapRow) {
        let written = serde_json::to_string(row)
            .map_err(std::io::Error::other)
            .and_then(|json| writeln!(self.out, "{json}"));
        if let Err(e) = written {
            warn!(error = %e, "Failed to write swap row");
        }
    }

    fn on_disconnected(&mut self, reason: &str) {
        info!(reason, "Feed interrupted, waiting to reconnect");
    }
}
