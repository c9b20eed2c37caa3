//! Implementation of the actix server.

use std::str::FromStr;

use actix_web::{
    get,
    http::StatusCode,
    middleware::Logger,
    post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, ResponseError,
};
use serde::{Deserialize, Serialize};

use crate::{
    err::SessionError,
    mutations::{
        annos::AnnotationList, chart::ChartData, export::write_table, export::LocusHandoff,
        filter::ViewState, load::load_dataset, schema::Signature,
    },
    session::{Command, Outcome, Selection, ViewRow, ViewToggle},
    sync::queue::Unsynced,
};

use super::{Args, WebServerData};

#[derive(Debug)]
struct CustomError {
    err: anyhow::Error,
    status: StatusCode,
}

impl std::fmt::Display for CustomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.err)
    }
}

impl CustomError {
    fn new(err: anyhow::Error) -> Self {
        CustomError {
            err,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn with_status(err: anyhow::Error, status: StatusCode) -> Self {
        CustomError { err, status }
    }
}

impl From<SessionError> for CustomError {
    fn from(value: SessionError) -> Self {
        let status = match &value {
            SessionError::UnknownRow(_) | SessionError::UnknownSignature(_) => {
                StatusCode::NOT_FOUND
            }
            SessionError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
        };
        CustomError::with_status(anyhow::Error::new(value), status)
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        self.status
    }
}

/// Current view toggles and rows.
#[derive(Serialize, Debug)]
struct RowsResponse<'a> {
    view: ViewState,
    rows: Vec<ViewRow<'a>>,
}

fn rows_response(data: &WebServerData) -> Result<HttpResponse, CustomError> {
    let session = data.session()?;
    Ok(HttpResponse::Ok().json(RowsResponse {
        view: session.view(),
        rows: session.rows(),
    }))
}

/// List the rows of the current view.
#[get("/api/mutations")]
async fn list_mutations(data: Data<WebServerData>) -> Result<HttpResponse, CustomError> {
    rows_response(&data)
}

/// Parameters for `update_view`; absent toggles are left unchanged.
#[derive(Deserialize, Debug, Clone, Default)]
struct ViewUpdate {
    show_silent: Option<bool>,
    show_blacklisted: Option<bool>,
}

/// Change the view toggles and return the re-filtered rows.
#[put("/api/view")]
async fn update_view(
    data: Data<WebServerData>,
    body: Json<ViewUpdate>,
) -> Result<HttpResponse, CustomError> {
    {
        let mut session = data.session()?;
        for (toggle, value) in [
            (ViewToggle::ShowSilent, body.show_silent),
            (ViewToggle::ShowBlacklisted, body.show_blacklisted),
        ] {
            if let Some(value) = value {
                session.dispatch(Command::SetViewToggle(toggle, value), data.sink.as_ref())?;
            }
        }
    }
    rows_response(&data)
}

#[derive(Deserialize, Debug, Clone)]
struct ToggleRequest {
    signature: Signature,
}

#[derive(Serialize, Debug, Clone)]
struct ToggleResponse {
    list: AnnotationList,
    signature: Signature,
    present: bool,
}

/// Flip membership of a signature in the whitelist or blacklist.
#[post("/api/annotations/{list}/toggle")]
async fn toggle_annotation(
    data: Data<WebServerData>,
    path: Path<String>,
    body: Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, CustomError> {
    let list = AnnotationList::from_str(&path).map_err(|e| {
        CustomError::with_status(
            anyhow::anyhow!("invalid annotation list {:?}: {}", path.as_str(), e),
            StatusCode::BAD_REQUEST,
        )
    })?;
    let signature = body.into_inner().signature;
    let command = match list {
        AnnotationList::Whitelist => Command::ToggleWhitelist(signature),
        AnnotationList::Blacklist => Command::ToggleBlacklist(signature),
    };

    let mut session = data.session()?;
    match session.dispatch(command, data.sink.as_ref())? {
        Outcome::Toggled {
            list,
            signature,
            present,
        } => Ok(Json(ToggleResponse {
            list,
            signature,
            present,
        })),
        outcome => Err(CustomError::new(anyhow::anyhow!(
            "unexpected outcome of toggle: {:?}",
            outcome
        ))),
    }
}

fn select(data: &WebServerData, row: usize) -> Result<Selection, CustomError> {
    let mut session = data.session()?;
    match session.dispatch(Command::SelectRecord(row), data.sink.as_ref())? {
        Outcome::Selected(selection) => Ok(*selection),
        outcome => Err(CustomError::new(anyhow::anyhow!(
            "unexpected outcome of selection: {:?}",
            outcome
        ))),
    }
}

/// Details of one row.
#[get("/api/mutations/{row}")]
async fn get_mutation(
    data: Data<WebServerData>,
    path: Path<usize>,
) -> Result<Json<Selection>, CustomError> {
    Ok(Json(select(&data, path.into_inner())?))
}

/// Chart data of one row.
#[get("/api/mutations/{row}/chart")]
async fn get_chart(
    data: Data<WebServerData>,
    path: Path<usize>,
) -> Result<Json<ChartData>, CustomError> {
    Ok(Json(select(&data, path.into_inner())?.chart))
}

/// Genome browser hand-off of one row.
#[get("/api/mutations/{row}/locus")]
async fn get_locus(
    data: Data<WebServerData>,
    path: Path<usize>,
) -> Result<Json<LocusHandoff>, CustomError> {
    Ok(Json(select(&data, path.into_inner())?.locus))
}

#[derive(Deserialize, Debug, Clone, Default)]
struct ExportQuery {
    #[serde(default)]
    with_class: bool,
}

/// The current view as TSV.
#[get("/api/export")]
async fn export_table(
    data: Data<WebServerData>,
    query: Query<ExportQuery>,
) -> Result<HttpResponse, CustomError> {
    let mut buf = Vec::new();
    {
        let session = data.session()?;
        write_table(&mut buf, &session.table(), query.with_class).map_err(CustomError::new)?;
    }
    Ok(HttpResponse::Ok()
        .content_type("text/tab-separated-values")
        .body(buf))
}

#[derive(Serialize, Debug, Clone)]
struct SyncStatus {
    pending: usize,
    unsynced: Vec<Unsynced>,
}

/// Delivery state of annotation updates.
#[get("/api/sync")]
async fn sync_status(data: Data<WebServerData>) -> Result<Json<SyncStatus>, CustomError> {
    Ok(Json(SyncStatus {
        pending: data.sink.pending(),
        unsynced: data.sink.unsynced(),
    }))
}

#[derive(Serialize, Debug, Clone)]
struct ReloadResponse {
    records: usize,
    rows: usize,
}

/// Re-read all three payloads; the previous state is kept on failure.
#[post("/api/reload")]
async fn reload(data: Data<WebServerData>) -> Result<Json<ReloadResponse>, CustomError> {
    let inputs = data.inputs.clone();
    let dataset = web::block(move || load_dataset(&inputs))
        .await
        .map_err(|e| CustomError::new(anyhow::anyhow!("reload failed: {}", e)))?
        .map_err(|e| CustomError::new(anyhow::Error::new(e)))?;

    let mut session = data.session()?;
    let rows = match session.dispatch(Command::Load(Box::new(dataset)), data.sink.as_ref())? {
        Outcome::Refreshed { rows } => rows,
        outcome => {
            return Err(CustomError::new(anyhow::anyhow!(
                "unexpected outcome of reload: {:?}",
                outcome
            )))
        }
    };
    Ok(Json(ReloadResponse {
        records: session.records().len(),
        rows,
    }))
}

/// Register all routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_mutations)
        .service(update_view)
        .service(toggle_annotation)
        .service(get_chart)
        .service(get_locus)
        .service(get_mutation)
        .service(export_table)
        .service(sync_status)
        .service(reload);
}

#[actix_web::main]
pub async fn main(args: &Args, data: Data<WebServerData>) -> std::io::Result<()> {
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(configure)
            .wrap(Logger::default())
    })
    .bind((args.listen_host.as_str(), args.listen_port))?
    .run()
    .await
}
