use std::{
    env,
    io::{self, Write},
    process::{Command, Stdio},
};

use anyhow::{Context, anyhow, bail};
use chrono::{Local, NaiveDate};

use rotaplan::{
    app::{Granularity, PlanGrid, PlannerState},
    roster::Period,
    storage::config::Config,
    sync::practice_api::{PracticeApiClient, SchedulingApi},
    sync::reconcile::reconcile,
    sync::submit::{SubmissionEngine, SubmitError},
};

#[derive(Debug, Clone, PartialEq)]
pub enum CliMode {
    Plan(PlanArgs),
    Templates { employee: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlanArgs {
    pub month: Option<NaiveDate>,
    pub employee: Option<String>,
    pub template: Option<String>,
    pub select_all: Option<Period>,
    pub submit: bool,
    pub reason: Option<String>,
}

pub fn parse_cli_mode() -> Result<CliMode, String> {
    parse_args(env::args().skip(1))
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliMode, String> {
    let mut plan = PlanArgs::default();
    let mut list_templates = false;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--month" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--month requires a value".to_string())?;
                let first = format!("{}/01", value);
                let date = NaiveDate::parse_from_str(&first, "%Y/%m/%d")
                    .map_err(|_| format!("Invalid month '{}'. Use YYYY/MM.", value))?;
                plan.month = Some(date);
            }
            "--employee" => {
                plan.employee = Some(
                    args.next()
                        .ok_or_else(|| "--employee requires a value".to_string())?,
                );
            }
            "--template" => {
                plan.template = Some(
                    args.next()
                        .ok_or_else(|| "--template requires a value".to_string())?,
                );
            }
            "--select-all" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--select-all requires a period".to_string())?;
                let period = match value.as_str() {
                    "morning" => Period::Morning,
                    "afternoon" => Period::Afternoon,
                    "full-day" | "full_day" => Period::FullDay,
                    other => {
                        return Err(format!(
                            "Unknown period '{}'. Use morning, afternoon or full-day.",
                            other
                        ));
                    }
                };
                plan.select_all = Some(period);
            }
            "--submit" => {
                plan.submit = true;
            }
            "--templates" => {
                list_templates = true;
            }
            "--reason" => {
                plan.reason = Some(
                    args.next()
                        .ok_or_else(|| "--reason requires a value".to_string())?,
                );
            }
            "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    if list_templates {
        Ok(CliMode::Templates {
            employee: plan.employee,
        })
    } else {
        Ok(CliMode::Plan(plan))
    }
}

pub fn usage() -> &'static str {
    "Usage: rotaplan [--month YYYY/MM] [--employee ID] [--template NAME] \
     [--select-all morning|afternoon|full-day] [--submit] [--reason TEXT] [--templates]"
}

fn resolve_employee(cli_value: Option<String>, config: &Config) -> anyhow::Result<String> {
    cli_value
        .or_else(|| (!config.defaults.employee.is_empty()).then(|| config.defaults.employee.clone()))
        .ok_or_else(|| anyhow!("no employee given; pass --employee or set defaults.employee in the config"))
}

pub async fn run_plan_mode(args: PlanArgs) -> anyhow::Result<()> {
    let config = Config::load_or_create().context("failed to load configuration")?;
    let employee = resolve_employee(args.employee.clone(), &config)?;

    let anchor = args.month.unwrap_or_else(|| Local::now().date_naive());
    let granularity =
        Granularity::from_name(&config.defaults.view).unwrap_or(Granularity::Month);
    let client = PracticeApiClient::new(config.api.base_url.clone(), config.api.auth_token.clone());

    let mut planner = PlannerState::new(&employee, anchor, granularity);

    if let Some(range) = planner.visible_range() {
        let index = reconcile(&client, &employee, &range).await;
        planner.set_index(index);
    }

    if let Some(name) = &args.template {
        let templates = client
            .fetch_templates(&employee)
            .await
            .context("failed to fetch templates")?;
        let Some(template) = templates.into_iter().find(|t| &t.name == name) else {
            bail!("no template named '{}' for {}", name, employee);
        };
        planner.apply_template(Some(template));
    }

    if let Some(period) = args.select_all {
        planner.select_all(period);
    }

    if args.submit {
        let batch = planner.build_batch();
        let template_id = planner.template.as_ref().map(|t| t.id.clone());
        let engine =
            SubmissionEngine::new(client).with_split_full_days(config.submit.split_full_days);

        match engine
            .submit(
                &employee,
                batch,
                &planner.index,
                template_id.as_deref(),
                args.reason.as_deref(),
            )
            .await
        {
            Ok(report) => {
                println!(
                    "Submitted: {} created, {} skipped, {} failed",
                    report.succeeded, report.skipped, report.failed
                );
                if !report.conflicting_dates.is_empty() {
                    let dates: Vec<String> = report
                        .conflicting_dates
                        .iter()
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .collect();
                    println!("Conflicting dates: {}", dates.join(", "));
                }
            }
            Err(SubmitError::NothingSelected) => {
                eprintln!("Nothing selected; no requests were sent.");
            }
        }
        return Ok(());
    }

    let text = format_plan_text(&planner);
    display_with_pager(&text).context("failed to display plan")
}

pub async fn run_templates_mode(employee: Option<String>) -> anyhow::Result<()> {
    let config = Config::load_or_create().context("failed to load configuration")?;
    let employee = resolve_employee(employee, &config)?;

    let client = PracticeApiClient::new(config.api.base_url.clone(), config.api.auth_token.clone());
    let templates = client
        .fetch_templates(&employee)
        .await
        .context("failed to fetch templates")?;

    if templates.is_empty() {
        println!("No templates for {}.", employee);
        return Ok(());
    }

    for template in &templates {
        println!("{}", format_template_line(template));
    }
    Ok(())
}

fn format_template_line(template: &rotaplan::WeeklyTemplate) -> String {
    use chrono::Weekday;

    let weekdays = [
        (Weekday::Mon, "Mon"),
        (Weekday::Tue, "Tue"),
        (Weekday::Wed, "Wed"),
        (Weekday::Thu, "Thu"),
        (Weekday::Fri, "Fri"),
        (Weekday::Sat, "Sat"),
        (Weekday::Sun, "Sun"),
    ];

    let days: Vec<String> = weekdays
        .iter()
        .filter_map(|(weekday, label)| {
            template
                .period_for(*weekday)
                .map(|p| format!("{} {}", label, p.wire_code()))
        })
        .collect();

    if days.is_empty() {
        format!("{}: rest week", template.name)
    } else {
        format!("{}: {}", template.name, days.join(", "))
    }
}

fn format_plan_text(planner: &PlannerState) -> String {
    let mut lines = Vec::new();

    let title = match &planner.grid {
        PlanGrid::Month(month) => {
            format!("Work requests – {} {} ({})", month.label(), month.year, planner.employee_id)
        }
        _ => format!("Work requests ({})", planner.employee_id),
    };
    lines.push(title);
    lines.push(String::new());
    lines.push(" Mon  Tue  Wed  Thu  Fri  Sat  Sun".to_string());

    for week in planner.grid.active_cells().chunks(7) {
        let mut row = String::new();
        for cell in week {
            match cell.date {
                None => row.push_str("     "),
                Some(date) => {
                    let marker = if planner.index.is_fully_booked(date) {
                        '✓'
                    } else {
                        match cell.period {
                            Some(Period::Morning) => 'M',
                            Some(Period::Afternoon) => 'A',
                            Some(Period::FullDay) => 'F',
                            None => ' ',
                        }
                    };
                    row.push_str(&format!(" {:>2}{} ", date.format("%d"), marker));
                }
            }
        }
        lines.push(row.trim_end().to_string());
    }

    lines.push(String::new());
    lines.push(format!("{} day(s) selected", planner.selected_count()));
    lines.push("M morning · A afternoon · F full day · ✓ already confirmed".to_string());

    lines.join("\n")
}

fn display_with_pager(text: &str) -> Result<(), io::Error> {
    let pager_value = env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut parts = pager_value.split_whitespace();
    let cmd = match parts.next() {
        Some(c) => c,
        None => {
            print!("{text}");
            return Ok(());
        }
    };
    let args: Vec<&str> = parts.collect();

    match Command::new(cmd)
        .args(&args)
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            let _ = child.wait();
        }
        Err(_) => {
            print!("{text}");
        }
    }

    Ok(())
}
