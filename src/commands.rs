use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::collectors::{HeadHunter, JobCollector};
use crate::config::{Command, Config, SearchArgs};
use crate::models::Vacancy;
use crate::pipeline::{filter_by_keywords, filter_by_salary, parse_salary_range, top_n};
use crate::store::{DeleteSelector, JsonStore, VacancyCriteria, VacancyStore};

/// Dispatch the resolved subcommand.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let store = JsonStore::new(&config.store_path);

    match config.resolved_command() {
        Command::Interactive => {
            let collector = build_collector(&config)?;
            interactive(&collector, &store).await
        }
        Command::Search(args) => {
            let collector = build_collector(&config)?;
            let top = search(&collector, &store, &args).await?;
            print!("{}", render_vacancies(&top));
            Ok(())
        }
        Command::Query {
            keyword,
            city,
            currency,
            min_salary,
        } => {
            let criteria = VacancyCriteria {
                keyword,
                city,
                currency,
                min_salary,
            };
            let found = Vacancy::from_values(&store.query(&criteria));
            print!("{}", render_vacancies(&found));
            Ok(())
        }
        Command::Delete { id, url } => {
            let removed = store.delete(&DeleteSelector { id, url })?;
            println!("Deleted {removed} vacancies.");
            Ok(())
        }
    }
}

fn build_collector(config: &Config) -> anyhow::Result<HeadHunter> {
    let collector = HeadHunter::new(
        config.api_url.as_str(),
        &config.user_agent,
        config.per_page,
        Duration::from_secs(config.timeout_secs),
    )?;
    tracing::debug!(
        "Using {} with {} items per page",
        collector.base_url(),
        collector.per_page()
    );
    Ok(collector)
}

/// Collect, filter, rank and (unless disabled) store the top vacancies.
pub async fn search(
    collector: &dyn JobCollector,
    store: &JsonStore,
    args: &SearchArgs,
) -> anyhow::Result<Vec<Vacancy>> {
    let raw = collector.load(&args.keyword, args.max_items).await?;
    let vacancies = Vacancy::from_values(&raw);
    let found = vacancies.len();

    let vacancies = filter_by_keywords(vacancies, &args.words);
    let vacancies = filter_by_salary(vacancies, parse_salary_range(&args.salary));
    let top = top_n(vacancies, args.top);
    tracing::info!(
        "{found} vacancies found for '{}', showing top {}",
        args.keyword,
        top.len()
    );

    if !args.no_save {
        let records: Vec<_> = top.iter().map(Vacancy::to_value).collect();
        let outcome = store.save(&records);
        if !outcome.persisted {
            tracing::warn!("Results were not written to {}", store.path().display());
        }
    }

    Ok(top)
}

/// Numbered listing, one vacancy per line.
pub fn render_vacancies(vacancies: &[Vacancy]) -> String {
    if vacancies.is_empty() {
        return "Nothing found.\n".to_string();
    }
    vacancies
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{:>2}. {v}\n", i + 1))
        .collect()
}

async fn interactive(collector: &dyn JobCollector, store: &JsonStore) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let keyword = prompt(&mut lines, "Search query (e.g. Python): ").await?;
    if keyword.is_empty() {
        println!("Empty query, exiting.");
        return Ok(());
    }

    let top_input = prompt(&mut lines, "How many top vacancies to show [10]: ").await?;
    let top = if top_input.is_empty() {
        10
    } else {
        top_input
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("Invalid number '{top_input}': {e}"))?
    };

    let words = prompt(&mut lines, "Filter words, space separated (optional): ").await?;
    let salary = prompt(
        &mut lines,
        "Salary or range, e.g. 120000-200000 (optional): ",
    )
    .await?;

    println!("Searching...");
    let args = SearchArgs {
        keyword,
        top,
        words: words.split_whitespace().map(String::from).collect(),
        salary,
        max_items: 500,
        no_save: false,
    };
    let vacancies = search(collector, store, &args).await?;

    print!("{}", render_vacancies(&vacancies));
    println!(
        "\nSaved {} vacancies to {}.",
        vacancies.len(),
        store.path().display()
    );
    Ok(())
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, question: &str) -> anyhow::Result<String> {
    print!("{question}");
    std::io::stdout().flush()?;
    let line = lines.next_line().await?.unwrap_or_default();
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::collectors::{ApiPage, PageQuery};
    use crate::error::AppError;

    struct OnePage(Vec<Value>);

    #[async_trait]
    impl JobCollector for OnePage {
        fn name(&self) -> &str {
            "one-page"
        }

        fn per_page(&self) -> u32 {
            100
        }

        async fn request(&self, _query: &PageQuery) -> Result<ApiPage, AppError> {
            Ok(ApiPage {
                items: self.0.clone(),
                pages: Some(1),
            })
        }
    }

    fn listing(id: &str, name: &str, from: u64, requirement: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "area": { "name": "Москва" },
            "salary": { "from": from, "to": null, "currency": "RUR" },
            "snippet": { "requirement": requirement },
            "url": format!("https://api.hh.ru/vacancies/{id}"),
        })
    }

    fn args(words: &[&str], salary: &str, top: i64, no_save: bool) -> SearchArgs {
        SearchArgs {
            keyword: "developer".to_string(),
            top,
            words: words.iter().map(|w| w.to_string()).collect(),
            salary: salary.to_string(),
            max_items: 50,
            no_save,
        }
    }

    fn temp_store() -> (std::path::PathBuf, JsonStore) {
        let dir = std::env::temp_dir().join(format!("vacancy-search-{}", uuid::Uuid::new_v4()));
        let store = JsonStore::new(dir.join("vacancies.json"));
        (dir, store)
    }

    #[tokio::test]
    async fn search_filters_ranks_and_saves() {
        let collector = OnePage(vec![
            listing("1", "Rust Developer", 200_000, "tokio"),
            listing("2", "Go Developer", 250_000, "grpc"),
            listing("3", "Senior Rust Developer", 300_000, "axum"),
            listing("4", "Junior Rust Developer", 90_000, "basics"),
            json!("not a vacancy"),
        ]);
        let (dir, store) = temp_store();

        let top = search(&collector, &store, &args(&["rust"], "100000-", 5, false))
            .await
            .unwrap();
        let names: Vec<&str> = top.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["Senior Rust Developer", "Rust Developer"]);

        let stored = store.read_all();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0]["id"], "3");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn search_without_save_leaves_store_alone() {
        let collector = OnePage(vec![listing("1", "Rust Developer", 200_000, "tokio")]);
        let (dir, store) = temp_store();

        let top = search(&collector, &store, &args(&[], "", 10, true))
            .await
            .unwrap();
        assert_eq!(top.len(), 1);
        assert!(!store.path().exists());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn renders_numbered_listing() {
        let vacancies = Vacancy::from_values(&[
            listing("1", "Python Dev", 100_000, ""),
            listing("2", "Backend", 120_000, ""),
        ]);
        let out = render_vacancies(&vacancies);
        assert_eq!(
            out,
            " 1. Python Dev (Москва); salary: from 100000 to - RUR\n 2. Backend (Москва); salary: from 120000 to - RUR\n"
        );
    }

    #[test]
    fn renders_empty_listing() {
        assert_eq!(render_vacancies(&[]), "Nothing found.\n");
    }
}
