use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use clap::Parser;
use iced::widget::image;
use iced::{Element, Task, Theme};
use scanomalycore::session::{
    AnalysisSession, DatabaseSession, NoticeBoard, Severity, NOTICE_TTL,
};
use scanomalycore::{ApiError, Mode, PersistedResult, Prediction};

use gateway::Gateway;

mod gateway;
mod view;

#[derive(Parser)]
#[command(author, version, about = "Desktop viewer for the Scanomaly tumor-classification service")]
struct Args {
    /// Base URL of the prediction/persistence backend
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    backend: String,
}

fn main() -> iced::Result {
    env_logger::init();
    let args = Args::parse();
    let gateway = Gateway::new(&args.backend);

    iced::application(
        move || Scanomaly::boot(gateway.clone()),
        Scanomaly::update,
        Scanomaly::view,
    )
    .title(application_title)
    .theme(application_theme)
    .window_size((540.0, 820.0))
    .run()
}

fn application_title(_: &Scanomaly) -> String {
    "Scanomaly".into()
}

fn application_theme(_: &Scanomaly) -> Theme {
    Theme::Dark
}

/// Top-level application state: one session per concern plus the decoded
/// image handles the widgets render from.
#[derive(Debug)]
pub struct Scanomaly {
    gateway: Gateway,
    pub mode: Mode,
    pub scan: AnalysisSession,
    pub database: DatabaseSession,
    pub notices: NoticeBoard,
    pub scan_heatmap: Option<image::Handle>,
    pub thumbnails: HashMap<i64, image::Handle>,
}

#[derive(Debug, Clone)]
pub enum Message {
    PickFile,
    FilePicked(Option<(String, Vec<u8>)>),
    PredictSettled(u64, Result<Prediction, ApiError>),
    SaveResult,
    SaveSettled(Result<(), ApiError>),
    SwitchMode(Mode),
    ResultsSettled(u64, Result<Vec<PersistedResult>, ApiError>),
    ToggleSelect(i64),
    OpenDetail(PersistedResult),
    CloseDetail,
    DeleteSelected,
    DeleteSettled(Vec<i64>, Result<(), ApiError>),
    NoticeExpired(u64),
}

impl Scanomaly {
    fn boot(gateway: Gateway) -> (Self, Task<Message>) {
        (
            Scanomaly {
                gateway,
                mode: Mode::Scan,
                scan: AnalysisSession::new(),
                database: DatabaseSession::new(),
                notices: NoticeBoard::new(),
                scan_heatmap: None,
                thumbnails: HashMap::new(),
            },
            Task::none(),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::PickFile => Task::perform(pick_scan_file(), Message::FilePicked),
            Message::FilePicked(None) => Task::none(),
            Message::FilePicked(Some((file_name, bytes))) => {
                // A pick during an in-flight upload supersedes it; the older
                // settlement arrives with a stale token and is dropped.
                let token = state.scan.begin_upload();
                state.scan_heatmap = None;
                let gateway = state.gateway.clone();
                Task::perform(
                    async move { gateway.predict(file_name, bytes).await },
                    move |outcome| Message::PredictSettled(token, outcome),
                )
            }
            Message::PredictSettled(token, Ok(prediction)) => {
                if state.scan.finish_upload(token, Some(prediction)) {
                    state.scan_heatmap = state.scan.heatmap().and_then(decode_heatmap);
                }
                Task::none()
            }
            Message::PredictSettled(token, Err(err)) => {
                if state.scan.finish_upload(token, None) {
                    log::warn!("{err}");
                    return state.show_notice(err.notice(), Severity::Error);
                }
                Task::none()
            }
            Message::SaveResult => match state.scan.save_request() {
                Some(request) => {
                    let gateway = state.gateway.clone();
                    Task::perform(async move { gateway.save(request).await }, Message::SaveSettled)
                }
                None => state.show_notice("No prediction to save", Severity::Error),
            },
            Message::SaveSettled(Ok(())) => {
                state.show_notice("Result saved successfully", Severity::Success)
            }
            Message::SaveSettled(Err(err)) => {
                log::warn!("{err}");
                state.show_notice(err.notice(), Severity::Error)
            }
            Message::SwitchMode(mode) => {
                if state.mode == mode {
                    return Task::none();
                }
                state.mode = mode;
                // The switch clears the selection in both directions,
                // independent of the refetch outcome.
                state.database.clear_selection();
                if mode == Mode::Database {
                    let token = state.database.begin_refresh();
                    let gateway = state.gateway.clone();
                    return Task::perform(
                        async move { gateway.list_all().await },
                        move |outcome| Message::ResultsSettled(token, outcome),
                    );
                }
                Task::none()
            }
            Message::ResultsSettled(token, Ok(results)) => {
                if state.database.apply_fetch(token, Some(results)) {
                    state.rebuild_thumbnails();
                }
                Task::none()
            }
            Message::ResultsSettled(token, Err(err)) => {
                if state.database.apply_fetch(token, None) {
                    log::warn!("{err}");
                    return state.show_notice(err.notice(), Severity::Error);
                }
                Task::none()
            }
            Message::ToggleSelect(id) => {
                state.database.toggle_select(id);
                Task::none()
            }
            Message::OpenDetail(result) => {
                state.database.open_detail(result);
                Task::none()
            }
            Message::CloseDetail => {
                state.database.close_detail();
                Task::none()
            }
            Message::DeleteSelected => match state.database.delete_request() {
                Some(ids) => {
                    let gateway = state.gateway.clone();
                    let batch = ids.clone();
                    Task::perform(
                        async move { gateway.delete_many(batch).await },
                        move |outcome| Message::DeleteSettled(ids.clone(), outcome),
                    )
                }
                None => Task::none(),
            },
            Message::DeleteSettled(ids, Ok(())) => {
                state.database.apply_delete(&ids);
                state.thumbnails.retain(|id, _| !ids.contains(id));
                state.show_notice("Deleted successfully", Severity::Success)
            }
            Message::DeleteSettled(_, Err(err)) => {
                log::warn!("{err}");
                state.show_notice(err.notice(), Severity::Error)
            }
            Message::NoticeExpired(generation) => {
                state.notices.expire(generation);
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        view::root(state)
    }

    fn show_notice(&mut self, message: &str, severity: Severity) -> Task<Message> {
        let generation = self.notices.show(message, severity);
        Task::perform(tokio::time::sleep(NOTICE_TTL), move |_| {
            Message::NoticeExpired(generation)
        })
    }

    fn rebuild_thumbnails(&mut self) {
        self.thumbnails = self
            .database
            .results()
            .iter()
            .filter_map(|result| {
                decode_heatmap(&result.heatmap_image).map(|handle| (result.id, handle))
            })
            .collect();
    }
}

async fn pick_scan_file() -> Option<(String, Vec<u8>)> {
    let handle = rfd::AsyncFileDialog::new()
        .set_title("Select an MRI scan")
        .add_filter("image", &["png", "jpg", "jpeg"])
        .pick_file()
        .await?;
    let bytes = handle.read().await;
    Some((handle.file_name(), bytes))
}

/// Decodes a base64 heatmap body into an image handle. Accepts both the
/// bare wire form and the data-URI form the scan session stores.
fn decode_heatmap(data: &str) -> Option<image::Handle> {
    let encoded = data
        .rsplit_once(',')
        .map(|(_, body)| body)
        .unwrap_or(data);
    match B64.decode(encoded) {
        Ok(bytes) => Some(image::Handle::from_bytes(bytes)),
        Err(err) => {
            log::warn!("undecodable heatmap payload: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booted() -> Scanomaly {
        Scanomaly::boot(Gateway::new("http://127.0.0.1:5000")).0
    }

    fn glioma() -> Prediction {
        Prediction {
            label: "Glioma".into(),
            confidence: 0.874,
            heatmap: "AAAA".into(),
        }
    }

    fn row(id: i64) -> PersistedResult {
        PersistedResult {
            id,
            timestamp: "2026-08-25T10:15:00".into(),
            heatmap_image: "AAAA".into(),
            label: "Glioma Tumor".into(),
        }
    }

    /// Drives the app into database mode with a settled fetch. The first
    /// refresh always carries token 1.
    fn with_rows(state: &mut Scanomaly, rows: Vec<PersistedResult>) {
        let _ = Scanomaly::update(state, Message::SwitchMode(Mode::Database));
        let _ = Scanomaly::update(state, Message::ResultsSettled(1, Ok(rows)));
    }

    #[test]
    fn prediction_settles_into_scan_state() {
        let mut state = booted();
        let _ = Scanomaly::update(
            &mut state,
            Message::FilePicked(Some(("scan.png".into(), vec![1, 2, 3]))),
        );
        assert!(state.scan.uploading());

        let _ = Scanomaly::update(&mut state, Message::PredictSettled(1, Ok(glioma())));
        assert_eq!(state.scan.label(), Some("Glioma"));
        assert_eq!(state.scan.confidence_text().as_deref(), Some("87.40%"));
        assert!(state.scan_heatmap.is_some());
    }

    #[test]
    fn superseded_upload_cannot_overwrite_the_newer_one() {
        let mut state = booted();
        let _ = Scanomaly::update(
            &mut state,
            Message::FilePicked(Some(("a.png".into(), vec![1]))),
        );
        let _ = Scanomaly::update(
            &mut state,
            Message::FilePicked(Some(("b.png".into(), vec![2]))),
        );

        let mut newer = glioma();
        newer.label = "No Tumor".into();
        let _ = Scanomaly::update(&mut state, Message::PredictSettled(2, Ok(newer)));
        let _ = Scanomaly::update(&mut state, Message::PredictSettled(1, Ok(glioma())));
        assert_eq!(state.scan.label(), Some("No Tumor"));

        // a stale failure raises no banner either
        let _ = Scanomaly::update(
            &mut state,
            Message::PredictSettled(1, Err(ApiError::Prediction("500".into()))),
        );
        assert!(state.notices.current().is_none());
    }

    #[tokio::test]
    async fn saving_without_a_prediction_only_raises_a_notice() {
        let mut state = booted();
        let _ = Scanomaly::update(&mut state, Message::SaveResult);
        let notice = state.notices.current().unwrap();
        assert_eq!(notice.message, "No prediction to save");
        assert_eq!(notice.severity, Severity::Error);
    }

    #[tokio::test]
    async fn entering_database_mode_clears_selection_before_the_fetch_lands() {
        let mut state = booted();
        with_rows(&mut state, vec![row(3), row(7)]);
        let _ = Scanomaly::update(&mut state, Message::ToggleSelect(3));

        let _ = Scanomaly::update(&mut state, Message::SwitchMode(Mode::Scan));
        assert!(state.database.selection().is_empty());

        let _ = Scanomaly::update(&mut state, Message::SwitchMode(Mode::Database));
        assert!(state.database.selection().is_empty());

        // second fetch fails: cache from the first fetch survives
        let _ = Scanomaly::update(
            &mut state,
            Message::ResultsSettled(2, Err(ApiError::Fetch("503".into()))),
        );
        assert_eq!(state.database.results().len(), 2);
        assert_eq!(state.notices.current().unwrap().message, "Error fetching results");
    }

    #[test]
    fn switching_to_the_same_mode_is_a_no_op() {
        let mut state = booted();
        let _ = Scanomaly::update(&mut state, Message::SwitchMode(Mode::Scan));
        assert_eq!(state.mode, Mode::Scan);
    }

    #[tokio::test]
    async fn acknowledged_delete_prunes_rows_and_thumbnails() {
        let mut state = booted();
        with_rows(&mut state, vec![row(3), row(7), row(9)]);
        let _ = Scanomaly::update(&mut state, Message::ToggleSelect(3));
        let _ = Scanomaly::update(&mut state, Message::ToggleSelect(7));

        let _ = Scanomaly::update(&mut state, Message::DeleteSettled(vec![3, 7], Ok(())));
        assert_eq!(state.database.results().len(), 1);
        assert!(state.database.selection().is_empty());
        assert!(!state.thumbnails.contains_key(&3));
        assert!(state.thumbnails.contains_key(&9));
        assert_eq!(state.notices.current().unwrap().message, "Deleted successfully");
    }

    #[tokio::test]
    async fn failed_delete_leaves_rows_and_selection_alone() {
        let mut state = booted();
        with_rows(&mut state, vec![row(3), row(7)]);
        let _ = Scanomaly::update(&mut state, Message::ToggleSelect(3));

        let _ = Scanomaly::update(
            &mut state,
            Message::DeleteSettled(vec![3], Err(ApiError::Delete("500".into()))),
        );
        assert_eq!(state.database.results().len(), 2);
        assert!(state.database.selection().contains(3));
        assert_eq!(state.notices.current().unwrap().message, "Delete error");
    }

    #[tokio::test]
    async fn stale_notice_expiry_keeps_the_newer_banner() {
        let mut state = booted();
        let _ = Scanomaly::update(&mut state, Message::SaveResult); // generation 1
        let _ = Scanomaly::update(
            &mut state,
            Message::SaveSettled(Err(ApiError::Save("500".into()))), // generation 2
        );

        let _ = Scanomaly::update(&mut state, Message::NoticeExpired(1));
        assert_eq!(state.notices.current().unwrap().message, "Saving error");

        let _ = Scanomaly::update(&mut state, Message::NoticeExpired(2));
        assert!(state.notices.current().is_none());
    }

    #[test]
    fn detail_popup_opens_and_closes() {
        let mut state = booted();
        with_rows(&mut state, vec![row(3)]);
        let _ = Scanomaly::update(&mut state, Message::OpenDetail(row(3)));
        assert_eq!(state.database.detail().unwrap().id, 3);
        let _ = Scanomaly::update(&mut state, Message::CloseDetail);
        assert!(state.database.detail().is_none());
    }
}
