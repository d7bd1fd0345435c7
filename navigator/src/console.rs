//! Menu-driven console over a [`Navigator`].
//!
//! The console reads one line per prompt from any [`BufRead`] and writes to
//! any [`Write`], so sessions can be scripted. Bad input aborts the current
//! menu action with a message and returns to the menu; end of input ends the
//! session.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use log::{debug, info};

use crate::error::{NavigatorError, Result};
use crate::registry::Navigator;
use crate::route::Route;

/// Line that terminates location entry when adding a route.
pub const END_OF_POINTS: &str = "next";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Remove,
    Search,
    Favorites,
    Top,
    Choose,
    List,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = NavigatorError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim() {
            "1" => MenuChoice::Add,
            "2" => MenuChoice::Remove,
            "3" => MenuChoice::Search,
            "4" => MenuChoice::Favorites,
            "5" => MenuChoice::Top,
            "6" => MenuChoice::Choose,
            "7" => MenuChoice::List,
            "8" => MenuChoice::Exit,
            other => return Err(NavigatorError::invalid("menu choice", other)),
        })
    }
}

pub fn parse_distance(input: &str) -> Result<f64> {
    let input = input.trim();
    match input.parse::<f64>() {
        Ok(d) if d.is_finite() && d >= 0.0 => Ok(d),
        _ => Err(NavigatorError::invalid("distance", input)),
    }
}

pub fn parse_popularity(input: &str) -> Result<u32> {
    let input = input.trim();
    input
        .parse::<u32>()
        .map_err(|_| NavigatorError::invalid("popularity", input))
}

pub fn parse_flag(input: &str) -> Result<bool> {
    let input = input.trim();
    match input.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" => Ok(true),
        "false" | "no" | "n" => Ok(false),
        _ => Err(NavigatorError::invalid("favorite flag", input)),
    }
}

pub struct Console<R, W> {
    input: R,
    output: W,
    navigator: Navigator,
    top: usize,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// `top` is how many routes the top-routes entry lists.
    pub fn new(input: R, output: W, navigator: Navigator, top: usize) -> Self {
        Self {
            input,
            output,
            navigator,
            top,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn into_parts(self) -> (Navigator, W) {
        (self.navigator, self.output)
    }

    /// Run until the exit entry is chosen or input runs out.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let line = match self.read_line()? {
                Some(line) => line,
                None => break,
            };
            let choice = match line.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(e) => {
                    self.report(&e)?;
                    continue;
                }
            };
            if choice == MenuChoice::Exit {
                break;
            }

            debug!("menu choice {:?}", choice);
            match self.dispatch(choice) {
                Ok(()) => {}
                Err(NavigatorError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(NavigatorError::Io(e)) => return Err(NavigatorError::Io(e)),
                Err(e) => self.report(&e)?,
            }
        }
        writeln!(self.output, "Goodbye.")?;
        info!("session ended with {} routes", self.navigator.size());
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::Add => self.add_route(),
            MenuChoice::Remove => {
                let id = self.prompt("Route id to remove: ")?;
                self.navigator.remove_route(&id)?;
                writeln!(self.output, "Route removed.")?;
                Ok(())
            }
            MenuChoice::Search => {
                let start = self.prompt("Start point: ")?;
                let end = self.prompt("End point: ")?;
                let found = self.navigator.search_routes(&start, &end);
                self.print_routes("Search results:", &found)
            }
            MenuChoice::Favorites => {
                let destination = self.prompt("Destination point: ")?;
                let found = self.navigator.favorite_routes(&destination);
                self.print_routes("Favorite routes:", &found)
            }
            MenuChoice::Top => {
                let found = self.navigator.top_routes(self.top);
                let title = format!("Top {} routes:", self.top);
                self.print_routes(&title, &found)
            }
            MenuChoice::Choose => {
                let id = self.prompt("Route id to choose: ")?;
                let popularity = self.navigator.choose_route(&id)?;
                writeln!(self.output, "Route chosen, popularity is now {}.", popularity)?;
                Ok(())
            }
            MenuChoice::List => {
                let all = self.navigator.routes();
                self.print_routes("All routes:", &all)
            }
            MenuChoice::Exit => Ok(()),
        }
    }

    fn add_route(&mut self) -> Result<()> {
        let id = self.prompt("Route id: ")?;
        let mut points = Vec::new();
        loop {
            let point = self.prompt(&format!("Location ('{}' to finish): ", END_OF_POINTS))?;
            if point == END_OF_POINTS {
                break;
            }
            points.push(point);
        }
        // The whole form is read before any field is checked, so a bad field
        // never leaves unread answers to be taken as menu choices.
        let distance = self.prompt("Distance: ")?;
        let popularity = self.prompt("Popularity: ")?;
        let favorite = self.prompt("Favorite? (true/false): ")?;

        let route = Route::new(
            id,
            points,
            parse_distance(&distance)?,
            parse_popularity(&popularity)?,
            parse_flag(&favorite)?,
        )?;
        self.navigator.add_route(route)?;
        writeln!(self.output, "Route added.")?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        write!(
            self.output,
            "========= Navigator =========\n\
             1. Add route\n\
             2. Remove route\n\
             3. Search routes\n\
             4. Favorite routes\n\
             5. Top {} routes\n\
             6. Choose route\n\
             7. List routes\n\
             8. Exit\n\
             =============================\n\
             Enter choice: ",
            self.top
        )?;
        self.output.flush()?;
        Ok(())
    }

    fn print_routes(&mut self, title: &str, routes: &[Route]) -> Result<()> {
        writeln!(self.output, "{}", title)?;
        if routes.is_empty() {
            writeln!(self.output, "  (none)")?;
        }
        for route in routes {
            writeln!(self.output, "  {}", route)?;
        }
        Ok(())
    }

    fn report(&mut self, error: &NavigatorError) -> Result<()> {
        writeln!(self.output, "Error: {}", error)?;
        Ok(())
    }

    /// Write `label`, then read one line. End of input is an
    /// `UnexpectedEof` I/O error.
    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        self.read_line()?.ok_or_else(|| {
            NavigatorError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended mid-command",
            ))
        })
    }

    /// Next line without its terminator, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
