use std::io::{self, Write};
use std::sync::Arc;
use trip_planner::{
    BoardView, DragEnd, DropTarget, LinkParser, MockLinkParser, Place, PlaceDraft, PlaceId,
    Project, ProjectId, TripStore, apply_drag_end, logging, validate_place, validate_place_draft,
    validate_project_input, write_itinerary_csv, write_snapshot_json,
};

const SHORT_ID_LEN: usize = 8;

fn short_id(id: &impl ToString) -> String {
    id.to_string().chars().take(SHORT_ID_LEN).collect()
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            if len > widths[ci] {
                widths[ci] = len;
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&widths, &cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_row(widths: &[usize], cells: &[&str]) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.iter().enumerate() {
        line.push(' ');
        line.push_str(cell);
        let pad = widths[ci].saturating_sub(cell.chars().count());
        if pad > 0 {
            line.push_str(&" ".repeat(pad));
        }
        line.push_str(" |");
    }
    line
}

fn format_cost(cost: Option<f64>) -> String {
    cost.map(|c| c.to_string()).unwrap_or_default()
}

fn render_board(project: &Project) -> String {
    let board = BoardView::for_project(project);
    let mut rows = Vec::new();
    for column in &board.columns {
        if column.places.is_empty() {
            rows.push(vec![
                column.label.clone(),
                String::new(),
                String::new(),
                "(no places)".to_string(),
                String::new(),
                String::new(),
            ]);
        }
        for place in &column.places {
            rows.push(place_row(column.label.clone(), place));
        }
    }
    for place in &board.unscheduled {
        rows.push(place_row(format!("? ({})", place.day_index), place));
    }

    let mut out = format!(
        "{} [{}] {}\n",
        project.name,
        short_id(&project.id),
        project.duration_label()
    );
    out.push_str(&render_text_table(
        &["day", "id", "time", "name", "category", "cost"],
        &rows,
    ));
    out
}

fn place_row(day: String, place: &Place) -> Vec<String> {
    vec![
        day,
        short_id(&place.id),
        place.time.clone().unwrap_or_default(),
        place.name.clone(),
        place.category.clone(),
        format_cost(place.cost),
    ]
}

fn render_trips(store: &TripStore) -> String {
    if store.projects().is_empty() {
        return "No trips yet. Create one with 'trip new <days> <name>'.".to_string();
    }
    let current = store.current_project().map(|project| project.id);
    let rows: Vec<Vec<String>> = store
        .projects()
        .iter()
        .map(|project| {
            let marker = if Some(project.id) == current { "*" } else { "" };
            vec![
                marker.to_string(),
                short_id(&project.id),
                project.name.clone(),
                project.duration_label(),
                project.places.len().to_string(),
            ]
        })
        .collect();
    render_text_table(&["", "id", "name", "duration", "places"], &rows)
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  trips                              List trips (* marks the open one)\n  trip new <days> <name...>          Create a trip and open it\n  trip open <id>                     Open a trip\n  trip delete <id>                   Delete a trip and its places\n  show                               Show the open trip's board\n  summary                            One-line summary of the open trip\n  place add <day> <category> <name...>\n                                     Add a place to day <day> (1-based)\n  place link <url> [day]             Parse a map link and add the result (day 1 by default)\n  place move <id> <day-N|place id>   Drop a place on day N or onto another place\n  place cost <id> <amount>           Set cost\n  place time <id> <HH:MM>            Set time\n  place memo <id> <text...>          Set memo (rest of line)\n  place media <id> <ref>             Attach a media reference\n  place delete <id>                  Delete a place\n  export <csv|json>                  Print the itinerary (csv) or full state (json)\n  quit|exit                          Exit\nA single-word name picks a place or trip; otherwise ids may be shortened to any unique prefix."
    );
}

/// 1-based day number as typed by the user, turned into a zero-based index.
fn day_index_from_number(raw: &str) -> Result<i32, String> {
    raw.parse::<u32>()
        .ok()
        .and_then(|day| day.checked_sub(1))
        .and_then(|index| i32::try_from(index).ok())
        .ok_or_else(|| format!("Invalid day '{raw}' (expected a day number starting at 1)."))
}

/// Matches a case-insensitive name first, then an id prefix.
fn resolve_project(store: &TripStore, prefix: &str) -> Result<ProjectId, String> {
    let mut matches: Vec<ProjectId> = store
        .projects()
        .iter()
        .filter(|project| project.name.eq_ignore_ascii_case(prefix))
        .map(|project| project.id)
        .collect();
    if matches.is_empty() {
        matches = store
            .projects()
            .iter()
            .map(|project| project.id)
            .filter(|id| id.to_string().starts_with(prefix))
            .collect();
    }
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("No trip matches '{prefix}'.")),
        _ => Err(format!("Trip id '{prefix}' is ambiguous.")),
    }
}

fn resolve_place(project: &Project, prefix: &str) -> Result<PlaceId, String> {
    let mut matches: Vec<PlaceId> = project
        .places
        .iter()
        .filter(|place| place.name.eq_ignore_ascii_case(prefix))
        .map(|place| place.id)
        .collect();
    if matches.is_empty() {
        matches = project
            .places
            .iter()
            .map(|place| place.id)
            .filter(|id| id.to_string().starts_with(prefix))
            .collect();
    }
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("No place matches '{prefix}'.")),
        _ => Err(format!("Place id '{prefix}' is ambiguous.")),
    }
}

struct Cli {
    store: TripStore,
    link_parser: MockLinkParser,
}

impl Cli {
    fn new() -> Self {
        Self {
            store: TripStore::new(),
            link_parser: MockLinkParser::new(),
        }
    }

    fn current(&self) -> Result<Arc<Project>, String> {
        self.store
            .current_project()
            .ok_or_else(|| "No trip open. Use 'trip new' or 'trip open <id>'.".to_string())
    }

    fn trip(&mut self, args: &[&str]) -> Result<(), String> {
        match args {
            ["new", days, name @ ..] if !name.is_empty() => {
                let duration: u32 = days.parse().map_err(|_| "Invalid day count".to_string())?;
                let name = name.join(" ");
                validate_project_input(&name, duration).map_err(|e| format!("Error: {e}"))?;
                let project_id = self.store.create_project(name.clone(), duration);
                self.store.set_current_project(project_id);
                println!("Created trip '{}' ({}).", name, short_id(&project_id));
                Ok(())
            }
            ["open", prefix] => {
                let project_id = resolve_project(&self.store, prefix)?;
                self.store.set_current_project(project_id);
                let project = self.current()?;
                println!("{}", render_board(&project));
                Ok(())
            }
            ["delete", prefix] => {
                let project_id = resolve_project(&self.store, prefix)?;
                let name = self
                    .store
                    .project(&project_id)
                    .map(|project| project.name.clone())
                    .unwrap_or_default();
                self.store.delete_project(&project_id);
                println!("Deleted trip '{name}'.");
                Ok(())
            }
            _ => Err("Usage: trip new <days> <name...> | trip open <id> | trip delete <id>".into()),
        }
    }

    fn place(&mut self, args: &[&str]) -> Result<(), String> {
        let project = self.current()?;
        match args {
            ["add", day, category, name @ ..] if !name.is_empty() => {
                let day_index = day_index_from_number(day)?;
                let draft = PlaceDraft::new(name.join(" "), *category, day_index);
                validate_place_draft(&draft, project.duration).map_err(|e| format!("Error: {e}"))?;
                let name = draft.name.clone();
                self.store.add_place(&project.id, draft);
                println!("Added place '{name}' to Day {day}.");
                Ok(())
            }
            ["link", url, rest @ ..] if rest.len() <= 1 => {
                let day = rest.first().copied().unwrap_or("1");
                let day_index = day_index_from_number(day)?;
                let mut draft = self
                    .link_parser
                    .parse(url)
                    .map_err(|e| format!("Error: {e}"))?;
                draft.day_index = day_index;
                validate_place_draft(&draft, project.duration).map_err(|e| format!("Error: {e}"))?;
                let (name, category) = (draft.name.clone(), draft.category.clone());
                self.store.add_place(&project.id, draft);
                println!("Parsed link into '{name}' ({category}) and added it to Day {day}.");
                Ok(())
            }
            ["move", prefix, target] => {
                let place_id = resolve_place(&project, prefix)?;
                let target = self.parse_move_target(&project, target)?;
                let drag = DragEnd {
                    active: place_id,
                    over: Some(target),
                };
                let moved = apply_drag_end(&mut self.store, &project.id, &drag);
                let place = self
                    .store
                    .place(&project.id, &place_id)
                    .ok_or_else(|| "Place disappeared".to_string())?;
                if moved {
                    println!("Moved '{}' to Day {}.", place.name, place.day_index + 1);
                } else {
                    println!("'{}' is already on Day {}.", place.name, place.day_index + 1);
                }
                Ok(())
            }
            ["cost", prefix, amount] => {
                let cost: f64 = amount.parse().map_err(|_| "Invalid amount".to_string())?;
                self.edit_place(&project, prefix, |place| place.cost = Some(cost))
            }
            ["time", prefix, time] => {
                self.edit_place(&project, prefix, |place| place.time = Some(time.to_string()))
            }
            ["memo", prefix, text @ ..] => {
                let memo = text.join(" ");
                self.edit_place(&project, prefix, |place| {
                    place.memo = if memo.is_empty() { None } else { Some(memo) }
                })
            }
            ["media", prefix, reference] => self.edit_place(&project, prefix, |place| {
                place.media.push(reference.to_string())
            }),
            ["delete", prefix] => {
                let place_id = resolve_place(&project, prefix)?;
                self.store.delete_place(&project.id, &place_id);
                println!("Deleted place {}.", short_id(&place_id));
                Ok(())
            }
            _ => Err("Usage: place add|link|move|cost|time|memo|media|delete ... (see 'help')".into()),
        }
    }

    /// `day-N` uses the 1-based day number shown on the board.
    fn parse_move_target(&self, project: &Project, raw: &str) -> Result<DropTarget, String> {
        if let Some(day) = raw.strip_prefix("day-") {
            let day_index =
                day_index_from_number(day).map_err(|_| format!("Invalid day target '{raw}'"))?;
            if !project.contains_day(day_index) {
                return Err(format!("Day {day} is outside this {}-day trip.", project.duration));
            }
            return Ok(DropTarget::Day(day_index));
        }
        resolve_place(project, raw).map(DropTarget::Place)
    }

    fn edit_place<F>(&mut self, project: &Project, prefix: &str, edit: F) -> Result<(), String>
    where
        F: FnOnce(&mut Place),
    {
        let place_id = resolve_place(project, prefix)?;
        let mut place = project
            .place(&place_id)
            .cloned()
            .ok_or_else(|| "Place disappeared".to_string())?;
        edit(&mut place);
        validate_place(&place, project.duration).map_err(|e| format!("Error: {e}"))?;
        let name = place.name.clone();
        self.store.update_place(&project.id, place);
        println!("Updated place '{name}'.");
        Ok(())
    }

    fn export(&self, format: Option<&str>) -> Result<(), String> {
        let stdout = io::stdout();
        match format {
            Some("csv") => {
                let project = self.current()?;
                write_itinerary_csv(&project, stdout.lock()).map_err(|e| format!("Error: {e}"))
            }
            Some("json") => {
                write_snapshot_json(self.store.state(), stdout.lock())
                    .map_err(|e| format!("Error: {e}"))?;
                println!();
                Ok(())
            }
            _ => Err("Usage: export <csv|json>".into()),
        }
    }

    /// Returns `false` when the session should end.
    fn handle(&mut self, input: &str) -> bool {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            return true;
        };

        let result = match *cmd {
            "help" => {
                print_help();
                Ok(())
            }
            "quit" | "exit" => return false,
            "trips" => {
                println!("{}", render_trips(&self.store));
                Ok(())
            }
            "trip" => self.trip(args),
            "place" => self.place(args),
            "show" => self.current().map(|project| println!("{}", render_board(&project))),
            "summary" => self
                .current()
                .map(|project| println!("{}", project.summary().to_cli_summary())),
            "export" => self.export(args.first().copied()),
            other => Err(format!("Unknown command '{other}'. Type 'help'.")),
        };

        if let Err(message) = result {
            println!("{message}");
        }
        true
    }
}

fn main() {
    logging::init_tracing("trip_planner=warn");

    let mut cli = Cli::new();
    println!("Trip Planner (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if !cli.handle(input) {
            break;
        }
    }
}
