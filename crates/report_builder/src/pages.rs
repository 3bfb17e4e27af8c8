//! # Report Pages
//!
//! Builds the nine report pages, always in the same order, from an
//! aggregated [`MetricSet`] and the reference table. Every chart/table
//! pair follows one recipe: representative curve with std band,
//! reference envelope and event markers, then a phase table whose mean
//! cells carry the classification color.

use crate::chart::{ArmSlotDiagram, KinematicChart, TimeSeriesChart};
use crate::layout::{Block, Column, Paragraph, ReportPage};
use crate::pdf::color::{classification_fill, NAVY};
use crate::pdf::{Color, Font};
use crate::table::{Cell, Table};
use mocap_core::models::metrics::format_mean_std;
use mocap_core::models::reference::format_number;
use mocap_core::series::representative;
use mocap_core::{
    ArmSlotCategory, Classification, EventTimes, MetricKey, MetricSet, Phase, ReferenceRange,
    ReferenceTable, ScalarMetric, Segment, SequenceTiming, Signal,
};

pub const PAGE_TITLES: [&str; 9] = [
    "Summary",
    "Shoulder",
    "Elbow / Arm Slot",
    "Throwing Arm Stress",
    "Trunk",
    "Pelvis",
    "Hip-Shoulder Separation",
    "Kinematic Sequence",
    "Report Information",
];

const ANGLE_LABEL: &str = "Angle (°)";

const KEY_METRICS: [MetricKey; 10] = [
    MetricKey::ShoulderHorizontalAbduction,
    MetricKey::ShoulderAbduction,
    MetricKey::ShoulderExternalRotation,
    MetricKey::ElbowFlexion,
    MetricKey::TrunkForwardTilt,
    MetricKey::TrunkRotation,
    MetricKey::HipShoulderSeparation,
    MetricKey::PelvicForwardTilt,
    MetricKey::PelvicRotation,
    MetricKey::KneeFlexion,
];

const HSS_DESCRIPTION: &str = "Hip-Shoulder Separation is the difference in angle created \
between your pelvis rotation and trunk rotation. When the pelvis leads the trunk this angle is \
positive, and when you close the gap using all the stretch you created then the angle becomes \
negative around release as the trunk passes the pelvis. Hip-Shoulder Separation is created \
through proper trunk and pelvis rotation timing.";

/// Inputs shared by every page.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub metrics: &'a MetricSet,
    pub references: &'a ReferenceTable,
    pub events: EventTimes,
    pub timing: SequenceTiming,
}

impl<'a> ReportContext<'a> {
    pub fn new(metrics: &'a MetricSet, references: &'a ReferenceTable, events: EventTimes) -> Self {
        Self {
            metrics,
            references,
            events,
            timing: SequenceTiming::representative(),
        }
    }
}

/// All report pages in their fixed order.
pub fn build_pages(ctx: &ReportContext) -> Vec<ReportPage> {
    vec![
        summary_page(ctx),
        shoulder_page(ctx),
        elbow_arm_slot_page(ctx),
        stress_page(ctx),
        trunk_page(ctx),
        pelvis_page(ctx),
        hip_shoulder_separation_page(ctx),
        kinematic_sequence_page(ctx),
        information_page(),
    ]
}

// ============================================================================
// Cell text
// ============================================================================

/// "-36° - -12°"; empty without a reference.
pub fn reference_text(range: Option<&ReferenceRange>, unit: &str) -> String {
    match range {
        Some(r) => format!(
            "{}{unit} - {}{unit}",
            format_number(r.low()),
            format_number(r.high()),
            unit = unit
        ),
        None => String::new(),
    }
}

/// Unit shown next to scalar values in detail tables.
fn detail_unit(metric: ScalarMetric) -> &'static str {
    match metric.unit() {
        "%BW" | "%BWH" => "%",
        unit => unit,
    }
}

fn classified_cell(text: String, classification: Classification) -> Cell {
    Cell::new(text).filled(classification_fill(classification))
}

fn phase_cell(ctx: &ReportContext, metric: MetricKey, phase: Phase) -> Cell {
    let text = ctx
        .metrics
        .get(metric, phase)
        .map(|s| s.display("°"))
        .unwrap_or_else(|| "N/A".to_string());
    classified_cell(
        text,
        ctx.metrics.classify_phase(ctx.references, metric, phase),
    )
}

fn scalar_cell(ctx: &ReportContext, metric: ScalarMetric, with_std: bool) -> Cell {
    let unit = detail_unit(metric);
    let text = match ctx.metrics.scalar(metric) {
        Some(s) if with_std => format_mean_std(s.mean, s.std, unit),
        Some(s) => format!("{}{}", format_number(s.mean), unit),
        None => "N/A".to_string(),
    };
    classified_cell(
        text,
        ctx.metrics.classify_scalar(ctx.references, metric, with_std),
    )
}

// ============================================================================
// Shared building blocks
// ============================================================================

/// FP / MER / REL rows: mean ± std (classified) and reference.
pub fn phase_table(ctx: &ReportContext, metric: MetricKey) -> Table {
    let mut table = Table::new(&[0.6, 1.4, 1.4]).header(&["", "Mean ± Std Dev", "Reference"]);
    for phase in Phase::ALL {
        table.push_row(vec![
            Cell::new(phase.code()).bold(),
            phase_cell(ctx, metric, phase),
            Cell::new(reference_text(
                ctx.references.phase_range(metric, phase),
                "°",
            )),
        ]);
    }
    table
}

pub fn metric_chart(ctx: &ReportContext, metric: MetricKey, y_label: &str) -> TimeSeriesChart {
    TimeSeriesChart::new(
        metric.label(),
        y_label,
        representative(Signal::Angle(metric)),
        ctx.events,
    )
    .with_reference(ctx.references.envelope(metric))
}

fn metric_column(ctx: &ReportContext, metric: MetricKey, y_label: &str) -> Column {
    Column::new(
        1.0,
        vec![
            Block::Chart(metric_chart(ctx, metric, y_label).with_height(230.0)),
            Block::Spacer(8.0),
            Block::Table(phase_table(ctx, metric)),
        ],
    )
}

fn timing_line(ctx: &ReportContext) -> Block {
    Block::Paragraph(
        Paragraph::new(12.0)
            .span("Timing: ", Font::Bold, NAVY)
            .span(ctx.timing.verdict(), Font::Bold, NAVY),
    )
}

/// Three metrics side by side with a timing line underneath.
fn region_page(ctx: &ReportContext, title: &str, metrics: [(MetricKey, &str); 3]) -> ReportPage {
    let columns = metrics
        .iter()
        .map(|(metric, y_label)| metric_column(ctx, *metric, y_label))
        .collect();
    ReportPage::new(
        title,
        vec![Block::Columns(columns), Block::Spacer(14.0), timing_line(ctx)],
    )
}

// ============================================================================
// Pages
// ============================================================================

pub fn summary_page(ctx: &ReportContext) -> ReportPage {
    let mut key_metrics = Table::new(&[1.7, 1.0, 1.0, 1.0])
        .header(&["Key Metrics", "Foot Plant", "Max External Rotation", "Release"])
        .font_size(9.0);
    for metric in KEY_METRICS {
        let mut row = vec![Cell::new(metric.label()).bold()];
        row.extend(Phase::ALL.iter().map(|&phase| phase_cell(ctx, metric, phase)));
        key_metrics.push_row(row);
    }

    let mut velocities = Table::new(&[1.0, 1.0]).header(&["Angular Velocities"]);
    for metric in [
        ScalarMetric::KneeAngularVelocity,
        ScalarMetric::PelvisAngularVelocity,
        ScalarMetric::TrunkAngularVelocity,
        ScalarMetric::ElbowAngularVelocity,
        ScalarMetric::ShoulderAngularVelocity,
    ] {
        velocities.push_row(vec![
            Cell::new(metric.label()).bold(),
            scalar_cell(ctx, metric, false),
        ]);
    }

    let mut stress = Table::new(&[1.4, 1.0]).header(&["Stress"]);
    for (label, metric) in [
        ("Shoulder Force (%BW)", ScalarMetric::ShoulderForceBw),
        ("Shoulder Torque (%BWH)", ScalarMetric::ShoulderInternalRotationTorqueBwh),
        ("Elbow Torque (%BWH)", ScalarMetric::ElbowTorqueBwh),
    ] {
        stress.push_row(vec![Cell::new(label).bold(), scalar_cell(ctx, metric, false)]);
    }

    ReportPage::new(
        PAGE_TITLES[0],
        vec![
            Block::Paragraph(
                Paragraph::new(10.0)
                    .bold("Pitches analyzed: ")
                    .text(&ctx.metrics.trials().to_string()),
            ),
            Block::Spacer(8.0),
            Block::Columns(vec![
                Column::new(2.6, vec![Block::Table(key_metrics)]),
                Column::new(
                    1.2,
                    vec![
                        Block::Table(velocities),
                        Block::Spacer(16.0),
                        Block::Table(stress),
                    ],
                ),
            ]),
        ],
    )
}

pub fn shoulder_page(ctx: &ReportContext) -> ReportPage {
    region_page(
        ctx,
        PAGE_TITLES[1],
        [
            (MetricKey::ShoulderHorizontalAbduction, ANGLE_LABEL),
            (MetricKey::ShoulderAbduction, ANGLE_LABEL),
            (MetricKey::ShoulderExternalRotation, ANGLE_LABEL),
        ],
    )
}

pub fn elbow_arm_slot_page(ctx: &ReportContext) -> ReportPage {
    let arm_slot = ctx.metrics.scalar(ScalarMetric::ArmSlot);
    let category = arm_slot.and_then(|s| ArmSlotCategory::from_angle(s.mean));
    let value_color = category
        .map(|c| Color::hex_or(c.color_hex(), NAVY))
        .unwrap_or(NAVY);
    let value_text = arm_slot
        .map(|s| s.display())
        .unwrap_or_else(|| "N/A".to_string());
    let category_text = category.map(|c| c.name()).unwrap_or("N/A");

    let elbow = Column::new(
        1.15,
        vec![
            Block::Chart(
                metric_chart(ctx, MetricKey::ElbowFlexion, "Elbow Flexion Angle (°)")
                    .with_height(280.0),
            ),
            Block::Spacer(8.0),
            Block::Table(phase_table(ctx, MetricKey::ElbowFlexion).max_width(300.0)),
        ],
    );
    let slot = Column::new(
        0.85,
        vec![
            Block::Heading("Arm Slot".to_string()),
            Block::ArmSlot(ArmSlotDiagram::new(arm_slot.map(|s| s.mean)).with_height(200.0)),
            Block::Spacer(10.0),
            Block::Paragraph(
                Paragraph::new(12.0)
                    .bold("Arm Slot (°): ")
                    .span(&value_text, Font::Bold, value_color)
                    .centered(),
            ),
            Block::Spacer(4.0),
            Block::Paragraph(
                Paragraph::new(12.0)
                    .bold("Arm Slot: ")
                    .span(category_text, Font::Bold, value_color)
                    .centered(),
            ),
        ],
    );
    ReportPage::new(PAGE_TITLES[2], vec![Block::Columns(vec![elbow, slot])])
}

fn stress_table(ctx: &ReportContext, title: &str, rows: &[(&str, ScalarMetric)]) -> Table {
    let mut table = Table::new(&[1.6, 1.2, 1.0])
        .header(&[title, "Mean ± Std Dev", "Reference"])
        .font_size(8.0);
    for (label, metric) in rows {
        table.push_row(vec![
            Cell::new(*label).bold(),
            scalar_cell(ctx, *metric, true),
            Cell::new(reference_text(
                ctx.references.scalar_range(*metric),
                detail_unit(*metric),
            )),
        ]);
    }
    table
}

pub fn stress_page(ctx: &ReportContext) -> ReportPage {
    let column = |signal: Signal, title: &str, y_label: &str, table: Table| {
        Column::new(
            1.0,
            vec![
                Block::Chart(
                    TimeSeriesChart::new(title, y_label, representative(signal), ctx.events)
                        .with_height(230.0),
                ),
                Block::Spacer(8.0),
                Block::Table(table),
            ],
        )
    };

    let force = stress_table(
        ctx,
        "Shoulder Force",
        &[
            ("Max (N)", ScalarMetric::ShoulderForceN),
            ("Max (%BW)", ScalarMetric::ShoulderForceBw),
        ],
    );
    let shoulder_torque = stress_table(
        ctx,
        "Shoulder Torque",
        &[
            ("Horiz Abd Max (Nm)", ScalarMetric::ShoulderHorizontalAbductionTorqueNm),
            ("Horiz Abd Max (%BWH)", ScalarMetric::ShoulderHorizontalAbductionTorqueBwh),
            ("Int Rot Max (Nm)", ScalarMetric::ShoulderInternalRotationTorqueNm),
            ("Int Rot Max (%BWH)", ScalarMetric::ShoulderInternalRotationTorqueBwh),
        ],
    );
    let elbow_torque = stress_table(
        ctx,
        "Elbow Torque",
        &[
            ("Max (Nm)", ScalarMetric::ElbowTorqueNm),
            ("Max (%BWH)", ScalarMetric::ElbowTorqueBwh),
        ],
    );

    ReportPage::new(
        PAGE_TITLES[3],
        vec![Block::Columns(vec![
            column(
                Signal::ShoulderForce,
                "Shoulder Force",
                "Shoulder Distraction Force (N)",
                force,
            ),
            column(
                Signal::ShoulderTorque,
                "Shoulder Torque",
                "Shoulder Torque (Nm)",
                shoulder_torque,
            ),
            column(
                Signal::ElbowTorque,
                "Elbow Torque",
                "Elbow Varus Torque (Nm)",
                elbow_torque,
            ),
        ])],
    )
}

pub fn trunk_page(ctx: &ReportContext) -> ReportPage {
    region_page(
        ctx,
        PAGE_TITLES[4],
        [
            (MetricKey::TrunkForwardTilt, "Trunk Forward Tilt Angle (°)"),
            (MetricKey::TrunkLateralTilt, ANGLE_LABEL),
            (MetricKey::TrunkRotation, ANGLE_LABEL),
        ],
    )
}

pub fn pelvis_page(ctx: &ReportContext) -> ReportPage {
    region_page(
        ctx,
        PAGE_TITLES[5],
        [
            (MetricKey::PelvicForwardTilt, ANGLE_LABEL),
            (MetricKey::PelvicLateralTilt, ANGLE_LABEL),
            (MetricKey::PelvicRotation, ANGLE_LABEL),
        ],
    )
}

pub fn hip_shoulder_separation_page(ctx: &ReportContext) -> ReportPage {
    let metric = MetricKey::HipShoulderSeparation;
    ReportPage::new(
        PAGE_TITLES[6],
        vec![Block::Columns(vec![
            Column::new(
                1.6,
                vec![Block::Chart(
                    metric_chart(ctx, metric, "Hip-Shoulder Separation Angle (°)")
                        .with_height(330.0),
                )],
            ),
            Column::new(
                1.0,
                vec![
                    Block::Spacer(20.0),
                    Block::Paragraph(Paragraph::plain(HSS_DESCRIPTION, 11.0)),
                    Block::Spacer(16.0),
                    Block::Table(phase_table(ctx, metric)),
                ],
            ),
        ])],
    )
}

pub fn kinematic_sequence_page(ctx: &ReportContext) -> ReportPage {
    let series = Segment::ALL
        .iter()
        .map(|&segment| (segment, representative(Signal::AngularVelocity(segment))))
        .collect();

    let mut peaks = Table::new(&[1.0, 0.6, 1.5, 1.5]).header(&[
        "",
        "Order",
        "Mean ± Std Dev",
        "Reference",
    ]);
    for segment in Segment::ALL {
        let metric = segment.metric();
        let order = ctx
            .timing
            .rank(segment)
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        peaks.push_row(vec![
            Cell::new(segment.name()).bold(),
            Cell::new(order),
            scalar_cell(ctx, metric, true),
            Cell::new(reference_text(
                ctx.references.scalar_range(metric),
                metric.unit(),
            )),
        ]);
    }

    let order = ctx
        .timing
        .order()
        .iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(", ");

    ReportPage::new(
        PAGE_TITLES[7],
        vec![
            Block::Kinematic(KinematicChart::new(series, ctx.events)),
            Block::Spacer(12.0),
            Block::Columns(vec![
                Column::new(1.5, vec![Block::Table(peaks)]),
                Column::new(
                    1.0,
                    vec![
                        timing_line(ctx),
                        Block::Spacer(6.0),
                        Block::Paragraph(Paragraph::new(10.0).bold("Peak order: ").text(&order)),
                        Block::Spacer(6.0),
                        Block::Paragraph(Paragraph::plain(
                            "Energy should build from the ground up: pelvis, then trunk, \
                             then elbow, then shoulder, each peaking after the one before it.",
                            10.0,
                        )),
                    ],
                ),
            ]),
        ],
    )
}

fn term(label: &str, text: &str) -> Block {
    Block::Paragraph(Paragraph::new(10.0).bold(label).text(text))
}

fn bullet(text: &str) -> Block {
    Block::Paragraph(Paragraph::plain(&format!("\u{2022} {}", text), 10.0))
}

/// Split a label into two lines at the space nearest its middle.
fn two_lines(text: &str) -> String {
    let middle = text.len() / 2;
    let split = text
        .match_indices(' ')
        .map(|(i, _)| i)
        .min_by_key(|i| i.abs_diff(middle));
    match split {
        Some(i) => format!("{}\n{}", &text[..i], &text[i + 1..]),
        None => text.to_string(),
    }
}

pub fn information_page() -> ReportPage {
    let mut legend = Table::new(&[1.0, 1.0, 1.0]).font_size(8.0);
    legend.push_row(
        [
            Classification::InRange,
            Classification::NearRange,
            Classification::OutOfRange,
        ]
        .map(|c| classified_cell(two_lines(c.label()), c)),
    );

    let left = Column::new(
        1.0,
        vec![
            Block::Heading("Important Events".to_string()),
            term(
                "MKH: ",
                "Max Knee Height, the highest point of the lead knee during the leg lift.",
            ),
            term(
                "FP: ",
                "Foot Plant, when the lead foot contacts the ground. Solid blue line on the graphs.",
            ),
            term(
                "MER: ",
                "Max External Rotation, the point of greatest layback of the throwing arm. \
                 Dashed black line on the graphs.",
            ),
            term(
                "REL: ",
                "Release, when the ball leaves the hand. Solid red line on the graphs.",
            ),
            Block::Spacer(10.0),
            Block::Heading("Graphs".to_string()),
            bullet("All data is only on fastball mechanics."),
            bullet("Graphs start 0.1 seconds before MKH and end 0.1 seconds after release."),
            bullet("Thin blue line is the mean of your pitches."),
            bullet(
                "Darker blue-gray shaded area is one standard deviation around the mean. \
                 The smaller the region the more consistent your mechanics.",
            ),
            bullet("Lighter blue shaded region is the reference data."),
            bullet("Reference data is MLB averages from Kinatrax."),
        ],
    );

    let right = Column::new(
        1.0,
        vec![
            Block::Heading("Other Abbreviations".to_string()),
            term("BW: ", "Body Weight"),
            term("BWH: ", "Body Weight × Height"),
            term(
                "Std Dev: ",
                "Standard Deviation, how much a value varies from pitch to pitch.",
            ),
            Block::Spacer(10.0),
            Block::Heading("Tables".to_string()),
            Block::Table(legend),
            Block::Spacer(6.0),
            Block::Paragraph(Paragraph::plain(
                "Being in or out of range is just a guide, it is not necessarily good or bad.",
                10.0,
            )),
            Block::Spacer(10.0),
            Block::Heading("Skeletons".to_string()),
            Block::Paragraph(Paragraph::plain(
                "Skeleton images are from the mechanics of your highest velocity fastball, \
                 or from your first fastball if the data wasn't paired with Trackman.",
                10.0,
            )),
        ],
    );

    ReportPage::new(PAGE_TITLES[8], vec![Block::Columns(vec![left, right])])
}
