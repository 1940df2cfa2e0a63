//! Demo modules and the scripted session run against them

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use backoffice_core::{Entity, FieldValue, Record, SearchDelegate};
use backoffice_settings::TableSettings;
use backoffice_table::{
    BulkDeleteCoordinator, CategoryFilter, ColumnSort, ConfirmRequest, Confirmer, EntityFilter,
    FilterOption, PageNavigation, PaginationState, RowStyle, SortSpec, TableAction, TableConfig,
    TableController, TableState, TableView, TracingNotifier,
};
use chrono::NaiveDate;
use serde_json::json;

use crate::store::InMemoryStore;

/// A list screen: which fields are searchable, how it filters and sorts
pub struct ModuleDefinition {
    pub name: &'static str,
    pub search_keys: &'static [&'static str],
    pub filter_key: &'static str,
    pub filter_options: Vec<FilterOption>,
    pub sort_column: &'static str,
    pub date_fields: &'static [&'static str],
    pub columns: &'static [&'static str],
    /// Query typed during the demo session
    pub sample_query: &'static str,
    pub seed: serde_json::Value,
}

impl ModuleDefinition {
    pub fn records(&self) -> Result<Vec<Record>> {
        let mut records = Record::collection_from_json(&self.seed)
            .with_context(|| format!("Invalid seed data for {}", self.name))?;
        for record in &mut records {
            parse_dates(record, self.date_fields);
        }
        Ok(records)
    }

    pub fn entity_filter(&self) -> EntityFilter<Record> {
        EntityFilter::new(self.search_keys.iter().copied()).with_filter_key(self.filter_key)
    }
}

/// Store `YYYY-MM-DD` strings as dates so they sort chronologically
fn parse_dates(record: &mut Record, keys: &[&str]) {
    for key in keys {
        let Some(FieldValue::Text(text)) = record.field(key) else {
            continue;
        };
        match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
            Ok(date) => record.set_field(*key, date),
            Err(e) => tracing::debug!(id = record.id(), field = key, error = %e, "not a date"),
        }
    }
}

pub fn modules() -> Vec<ModuleDefinition> {
    vec![
        ModuleDefinition {
            name: "leads",
            search_keys: &["name", "email", "phone"],
            filter_key: "status",
            filter_options: vec![
                FilterOption::all("All statuses"),
                FilterOption::new("new", "New"),
                FilterOption::new("contacted", "Contacted"),
                FilterOption::new("won", "Won"),
                FilterOption::new("lost", "Lost"),
            ],
            sort_column: "value",
            date_fields: &[],
            columns: &["name", "email", "status", "value"],
            sample_query: "maria",
            seed: json!([
                { "id": "lead-1", "name": "Maria Souza", "email": "maria@acme.com", "phone": 5511987001i64, "status": "new", "value": 1200 },
                { "id": "lead-2", "name": "João Lima", "email": "joao@lima.dev", "phone": 5521443002i64, "status": "contacted", "value": 800 },
                { "id": "lead-3", "name": "Ana Maria Costa", "email": "ana@costa.com", "status": "won", "value": 4300 },
                { "id": "lead-4", "name": "Pedro Alves", "email": "pedro@alves.net", "phone": 5531222004i64, "status": "lost", "value": null },
                { "id": "lead-5", "name": "Carla Dias", "email": "carla@dias.com", "status": "new", "value": 2750 },
                { "id": "lead-6", "name": "Rafael Mendes", "email": "rafa@mendes.io", "status": "contacted", "value": 150 },
                { "id": "lead-7", "name": "Mariana Rocha", "email": "mariana@rocha.com", "status": "new", "value": 990, "isOptimistic": true, "pendingOperation": "create" },
                { "id": "lead-8", "name": "Bruno Teixeira", "email": "bruno@tx.com", "status": "won", "value": 6100 },
                { "id": "lead-9", "name": "Luiza Martins", "email": "luiza@martins.com", "status": "new", "value": 430 },
                { "id": "lead-10", "name": "Tiago Ramos", "email": "tiago@ramos.com", "status": "lost", "value": 0 },
                { "id": "lead-11", "name": "Fernanda Lopes", "email": "fe@lopes.com", "status": "contacted", "value": 3200 },
                { "id": "lead-12", "name": "Marcos Pinto", "email": "marcos@pinto.com", "status": "new", "value": 1875 }
            ]),
        },
        ModuleDefinition {
            name: "contracts",
            search_keys: &["client", "number"],
            filter_key: "status",
            filter_options: vec![
                FilterOption::all("All contracts"),
                FilterOption::new("active", "Active"),
                FilterOption::new("expired", "Expired"),
            ],
            sort_column: "start_date",
            date_fields: &["start_date"],
            columns: &["number", "client", "status", "start_date"],
            sample_query: "2024",
            seed: json!([
                { "id": 101, "number": "CT-2024-001", "client": "Acme Ltda", "status": "active", "start_date": "2024-03-01", "monthly_fee": 1500.0 },
                { "id": 102, "number": "CT-2023-014", "client": "Lima & Filhos", "status": "expired", "start_date": "2023-01-15", "monthly_fee": 900.0 },
                { "id": 103, "number": "CT-2024-007", "client": "Costa Engenharia", "status": "active", "start_date": "2024-07-20", "monthly_fee": 2200.5 },
                { "id": 104, "number": "CT-2022-031", "client": "Alves Comércio", "status": "expired", "start_date": "2022-11-02", "monthly_fee": 640.0 },
                { "id": 105, "number": "CT-2024-012", "client": "Dias Transportes", "status": "active", "start_date": "2024-10-05", "monthly_fee": 3100.0, "isOptimistic": true, "pendingOperation": "update" }
            ]),
        },
        ModuleDefinition {
            name: "service_orders",
            search_keys: &["number", "client", "description"],
            filter_key: "status",
            filter_options: vec![
                FilterOption::all("All orders"),
                FilterOption::new("open", "Open"),
                FilterOption::new("in_progress", "In progress"),
                FilterOption::new("done", "Done"),
            ],
            sort_column: "due_date",
            date_fields: &["due_date"],
            columns: &["number", "client", "status", "due_date", "attachment"],
            sample_query: "acme",
            seed: json!([
                { "id": "os-1", "number": "OS-0001", "client": "Acme Ltda", "description": "Air conditioner maintenance", "status": "open", "due_date": "2024-11-10", "attachment": "1.2 MB" },
                { "id": "os-2", "number": "OS-0002", "client": "Costa Engenharia", "description": "Electrical panel repair", "status": "in_progress", "due_date": "2024-10-28", "attachment": "800 KB" },
                { "id": "os-3", "number": "OS-0003", "client": "Dias Transportes", "description": "Fleet tracker install", "status": "done", "due_date": "2024-09-15", "attachment": null },
                { "id": "os-4", "number": "OS-0004", "client": "Lima & Filhos", "description": "Network cabling", "status": "open", "due_date": "2024-12-01", "attachment": "2 GB", "tags": ["urgent"] },
                { "id": "os-5", "number": "OS-0005", "client": "Acme Ltda", "description": "Generator inspection", "status": "open", "due_date": "pending", "isOptimistic": true, "pendingOperation": "delete" }
            ]),
        },
    ]
}

/// Confirms every request after logging the dialog it would show
pub struct AutoConfirmer {
    pub answer: bool,
}

#[async_trait]
impl Confirmer for AutoConfirmer {
    async fn confirm(&self, request: &ConfirmRequest) -> bool {
        tracing::info!(
            title = %request.title,
            detail = %request.detail,
            answer = self.answer,
            "{}",
            request.message
        );
        self.answer
    }
}

/// Run a scripted session against one module: search, filter, sort, page,
/// select and bulk delete.
#[tracing::instrument(skip_all, fields(module = module.name))]
pub async fn run_module(module: &ModuleDefinition, settings: &TableSettings) -> Result<TableView<Record>> {
    let store = Arc::new(InMemoryStore::new(module.name, module.records()?, module.search_keys));

    let pagination = PaginationState::new(settings.default_page_size)
        .with_page_sizes(settings.page_size_options.clone());
    let config = TableConfig::new(module.entity_filter()).with_search_debounce(settings.search_debounce());
    let state = TableState::new(config)
        .with_rows(store.snapshot())
        .with_pagination(pagination)
        .with_sort(Some(SortSpec::ascending(module.sort_column)));

    let delegate: Arc<dyn SearchDelegate<Record>> = store.clone();
    let (controller, mut events) = TableController::new(state, Some(delegate));

    let module_name = module.name;
    let event_log = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::info!(module = module_name, ?event, "table event");
        }
    });

    render(module, &controller.view());

    // Type the query one character at a time, faster than the debounce window
    let mut typed = String::new();
    for ch in module.sample_query.chars() {
        typed.push(ch);
        controller.dispatch(TableAction::SetSearchText(typed.clone()));
        tokio::time::sleep(Duration::from_millis(40)).await;
    }
    settle(settings).await;
    println!("search {:?}: {} results", module.sample_query, controller.view().match_count);
    render(module, &controller.view());

    controller.dispatch(TableAction::SetSearchText(String::new()));
    settle(settings).await;

    if let Some(option) = module.filter_options.get(1) {
        controller.dispatch(TableAction::SetFilter(CategoryFilter::from(option)));
        println!("filter {:?}", option.label);
        render(module, &controller.view());
        controller.dispatch(TableAction::SetFilter(CategoryFilter::All));
    }

    controller.dispatch(TableAction::ToggleSort(module.sort_column.to_string()));
    controller.dispatch(TableAction::SetPageSize(5));
    controller.dispatch(TableAction::NavigatePage(PageNavigation::Last));
    println!("sorted by {} descending", module.sort_column);
    render(module, &controller.view());

    controller.dispatch(TableAction::NavigatePage(PageNavigation::First));
    controller.dispatch(TableAction::ClickRow(0));
    controller.dispatch(TableAction::ToggleRow(0));
    controller.dispatch(TableAction::ToggleRow(1));

    let coordinator = BulkDeleteCoordinator::new(
        Arc::new(AutoConfirmer { answer: true }),
        Arc::new(TracingNotifier),
    );
    let outcome = controller.delete_selected(&coordinator, store.as_ref()).await;
    println!("bulk delete: {:?}", outcome);

    controller.dispatch(TableAction::SetRows(store.snapshot()));
    let view = controller.view();
    render(module, &view);

    drop(controller);
    if let Err(e) = event_log.await {
        tracing::warn!(error = %e, "event log task failed");
    }

    Ok(view)
}

async fn settle(settings: &TableSettings) {
    tokio::time::sleep(settings.search_debounce() + Duration::from_millis(200)).await;
}

fn render(module: &ModuleDefinition, view: &TableView<Record>) {
    println!("── {} ──", module.name);
    let header: Vec<String> = module
        .columns
        .iter()
        .map(|column| match view.column_sort(column) {
            ColumnSort::Ascending => format!("{} ▲", column),
            ColumnSort::Descending => format!("{} ▼", column),
            ColumnSort::Default => column.to_string(),
        })
        .collect();
    println!("{:<16}{}", "", header.join(" | "));
    for row in &view.rows {
        let marker = match row.presentation.style {
            RowStyle::None => ' ',
            RowStyle::Created => '+',
            RowStyle::Updated => '~',
            RowStyle::Deleting => '-',
            RowStyle::Pending => '?',
        };
        let check = if row.selected { "[x]" } else { "[ ]" };
        let cells: Vec<String> = module
            .columns
            .iter()
            .map(|column| row.entity.field(column).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        println!("{} {} {:<10} {}", marker, check, row.entity.id(), cells.join(" | "));
    }
    println!("{} [{}]", view.status_text, view.pagination_mode.display_name());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_data_is_valid() {
        for module in modules() {
            let records = module.records().unwrap();
            assert!(!records.is_empty(), "{}", module.name);
        }
    }

    #[test]
    fn test_dates_are_parsed() {
        let modules = modules();
        let contracts = modules.iter().find(|m| m.name == "contracts").unwrap();
        let records = contracts.records().unwrap();
        assert!(matches!(records[0].field("start_date"), Some(FieldValue::Date(_))));
        assert_eq!(records[0].id(), "101");

        let orders = modules.iter().find(|m| m.name == "service_orders").unwrap();
        let records = orders.records().unwrap();
        assert_eq!(records[4].field("due_date"), Some(FieldValue::from("pending")));
        assert_eq!(records[3].field("tags"), Some(FieldValue::Null));
    }

    #[tokio::test(start_paused = true)]
    async fn test_leads_session_deletes_two_rows() {
        let modules = modules();
        let leads = modules.iter().find(|m| m.name == "leads").unwrap();
        let view = run_module(leads, &TableSettings::default()).await.unwrap();
        assert_eq!(view.match_count, 10);
        assert_eq!(view.selected_count, 0);
        assert_eq!(view.column_sort("value"), ColumnSort::Descending);
        assert_eq!(view.column_sort("name"), ColumnSort::Default);
    }
}
