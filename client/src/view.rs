//! Pure widget projections of the application state. Nothing here mutates;
//! every interaction is routed back through [`Message`].

use iced::widget::{button, checkbox, column, container, image, row, scrollable, text, Column, Container};
use iced::{Alignment, Color, Element, Length};
use scanomalycore::records::PersistedResult;
use scanomalycore::session::{Notice, Severity};
use scanomalycore::Mode;

use crate::{Message, Scanomaly};

pub fn root(state: &Scanomaly) -> Element<'_, Message> {
    let header = column![
        text("Scanomaly").size(34),
        text("Deep-learning analysis of MRI scans for potential brain tumor types").size(13),
    ]
    .spacing(4)
    .align_x(Alignment::Center);

    let switcher = row![
        mode_button("Analyze", Mode::Scan, state.mode),
        mode_button("Database", Mode::Database, state.mode),
    ]
    .spacing(10);

    // The detail popup takes over the content area until explicitly closed.
    let content: Element<'_, Message> = if let Some(result) = state.database.detail() {
        detail_view(state, result)
    } else {
        match state.mode {
            Mode::Scan => scan_view(state),
            Mode::Database => database_view(state),
        }
    };

    let mut page = column![header, switcher, content]
        .spacing(18)
        .padding(20)
        .align_x(Alignment::Center)
        .width(Length::Fill);

    if let Some(notice) = state.notices.current() {
        page = page.push(banner(notice));
    }

    Container::new(page)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn mode_button(label: &'static str, target: Mode, current: Mode) -> Element<'static, Message> {
    let styled = if target == current {
        button(text(label).size(16)).style(button::primary)
    } else {
        button(text(label).size(16)).style(button::secondary)
    };
    styled
        .padding(10)
        .on_press(Message::SwitchMode(target))
        .into()
}

fn scan_view(state: &Scanomaly) -> Element<'_, Message> {
    let heatmap: Element<'_, Message> = match &state.scan_heatmap {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(320.0))
            .into(),
        None => text(if state.scan.uploading() {
            "Analyzing scan..."
        } else {
            "Upload a scan to see its heatmap"
        })
        .size(14)
        .into(),
    };

    let label = text(state.scan.label().unwrap_or("No prediction yet").to_string()).size(22);
    let confidence = text(
        state
            .scan
            .confidence_text()
            .map(|percent| format!("Confidence: {percent}"))
            .unwrap_or_default(),
    )
    .size(14);

    let select_label = if state.scan.uploading() {
        "Processing..."
    } else {
        "Select an image"
    };

    column![
        Container::new(heatmap)
            .center_x(Length::Fixed(340.0))
            .center_y(Length::Fixed(340.0)),
        label,
        confidence,
        row![
            button(text(select_label).size(16))
                .padding(10)
                .on_press(Message::PickFile),
            button(text("Save result").size(16))
                .padding(10)
                .on_press(Message::SaveResult),
        ]
        .spacing(12),
    ]
    .spacing(12)
    .align_x(Alignment::Center)
    .into()
}

fn database_view(state: &Scanomaly) -> Element<'_, Message> {
    if state.database.results().is_empty() {
        return Container::new(text("No results found").size(16))
            .padding(30)
            .into();
    }

    let rows = state
        .database
        .results()
        .iter()
        .fold(Column::new().spacing(8), |col, result| {
            col.push(result_row(state, result))
        });

    let mut listing = column![scrollable(rows).height(Length::Fixed(420.0))].spacing(12);

    let selected = state.database.selection().len();
    if selected > 0 {
        listing = listing.push(
            button(text(format!("Delete selected ({selected})")).size(16))
                .padding(10)
                .on_press(Message::DeleteSelected),
        );
    }

    listing.align_x(Alignment::Center).into()
}

fn result_row<'a>(state: &'a Scanomaly, result: &'a PersistedResult) -> Element<'a, Message> {
    let id = result.id;
    let thumbnail: Element<'a, Message> = match state.thumbnails.get(&id) {
        Some(handle) => image(handle.clone()).width(Length::Fixed(64.0)).into(),
        None => text("(no image)").size(12).into(),
    };

    let info = column![
        text(format!("Scan #{id}")).size(16),
        text(timestamp_label(&result.timestamp)).size(12),
    ]
    .spacing(2);

    row![
        checkbox(state.database.selection().contains(id))
            .on_toggle(move |_| Message::ToggleSelect(id)),
        button(row![thumbnail, info].spacing(12).align_y(Alignment::Center))
            .style(button::text)
            .on_press(Message::OpenDetail(result.clone())),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

fn detail_view<'a>(state: &'a Scanomaly, result: &'a PersistedResult) -> Element<'a, Message> {
    let heatmap: Element<'a, Message> = match state.thumbnails.get(&result.id) {
        Some(handle) => image(handle.clone()).width(Length::Fixed(320.0)).into(),
        None => text("(no image)").size(14).into(),
    };

    column![
        heatmap,
        text(format!("Scan #{}", result.id)).size(24),
        text(result.label.clone()).size(16),
        text(timestamp_label(&result.timestamp)).size(12),
        button(text("Close").size(16))
            .padding(10)
            .on_press(Message::CloseDetail),
    ]
    .spacing(10)
    .align_x(Alignment::Center)
    .into()
}

fn banner(notice: &Notice) -> Element<'_, Message> {
    let color = match notice.severity {
        Severity::Success => Color::from_rgb(0.13, 0.55, 0.28),
        Severity::Error => Color::from_rgb(0.75, 0.18, 0.18),
    };
    Container::new(text(notice.message.clone()).size(14))
        .padding(10)
        .width(Length::Fill)
        .style(move |_theme| container::Style {
            background: Some(color.into()),
            text_color: Some(Color::WHITE),
            ..container::Style::default()
        })
        .into()
}

fn timestamp_label(timestamp: &str) -> String {
    timestamp.get(..19).unwrap_or(timestamp).replace('T', " ")
}
