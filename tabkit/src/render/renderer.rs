//! Dataset + column spec → render model.
//!
//! Rendering is a single pass with no side effects. Configuration mistakes
//! (unknown columns, empty specs, bad footnote targets) fail the whole render;
//! there is no partial result.

use crate::config::{
    Alignment, ColumnDescriptor, ColumnSpec, Footnote, FootnoteLocation, ImageSource, Spanner,
    Transform,
};
use crate::data::{Dataset, Scalar};
use crate::error::TabkitError;
use crate::Result;

use super::model::{
    BodyCell, CellContent, FootnoteDef, Fragment, HeaderCell, ImageRef, ModelParts, RenderModel,
    SpannerCell,
};

/// Render a dataset with the given columns and footnotes.
///
/// Shorthand for building a [`TableRenderer`] without title, spanners or
/// source notes.
pub fn render(dataset: &Dataset, columns: &ColumnSpec, footnotes: &[Footnote]) -> Result<RenderModel> {
    footnotes
        .iter()
        .cloned()
        .fold(TableRenderer::new(dataset, columns.clone()), TableRenderer::footnote)
        .render()
}

/// Immutable table builder.
///
/// Every step consumes the builder and returns a new one, so there is no
/// shared table being edited in place. `render` can be called any number of
/// times and always produces the same model.
///
/// ```rust
/// use tabkit::{Alignment, ColumnDescriptor, ColumnSpec, Dataset, Footnote, TableRenderer};
///
/// let data = Dataset::new(
///     ["Rank", "Model", "Time"],
///     vec![
///         vec![1.into(), "A".into(), 2.0.into()],
///         vec![2.into(), "B".into(), 2.5.into()],
///     ],
/// )
/// .unwrap();
///
/// let model = TableRenderer::new(&data, ColumnSpec::select(["Rank", "Model"]))
///     .title("Leaderboard")
///     .footnote(Footnote::header("Model", "Public checkpoints only"))
///     .render()
///     .unwrap();
///
/// assert_eq!(model.headers().len(), 2);
/// assert_eq!(model.headers()[1].align, Alignment::Left);
/// assert_eq!(model.footnotes()[0].mark, "1");
/// ```
#[derive(Debug, Clone)]
pub struct TableRenderer<'a> {
    dataset: &'a Dataset,
    columns: ColumnSpec,
    footnotes: Vec<Footnote>,
    spanners: Vec<Spanner>,
    title: Option<String>,
    subtitle: Option<String>,
    source_notes: Vec<String>,
}

impl<'a> TableRenderer<'a> {
    pub fn new(dataset: &'a Dataset, columns: ColumnSpec) -> Self {
        Self {
            dataset,
            columns,
            footnotes: Vec::new(),
            spanners: Vec::new(),
            title: None,
            subtitle: None,
            source_notes: Vec::new(),
        }
    }

    /// Builder: append a column
    pub fn column(mut self, descriptor: ColumnDescriptor) -> Self {
        self.columns = self.columns.column(descriptor);
        self
    }

    /// Builder: attach a footnote
    pub fn footnote(mut self, footnote: Footnote) -> Self {
        self.footnotes.push(footnote);
        self
    }

    /// Builder: add a spanner over adjacent columns
    pub fn spanner(mut self, spanner: Spanner) -> Self {
        self.spanners.push(spanner);
        self
    }

    /// Builder: set title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: set subtitle
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Builder: add a source note below the table
    pub fn source_note(mut self, note: impl Into<String>) -> Self {
        self.source_notes.push(note.into());
        self
    }

    /// Produce the render model.
    pub fn render(&self) -> Result<RenderModel> {
        if self.dataset.column_count() == 0 {
            return Err(TabkitError::config("dataset has no columns"));
        }
        if self.columns.is_empty() {
            return Err(TabkitError::config("column spec is empty"));
        }
        self.columns.validate()?;

        let sources = resolve_sources(self.dataset, &self.columns)?;
        tracing::debug!(
            columns = self.columns.len(),
            rows = self.dataset.row_count(),
            footnotes = self.footnotes.len(),
            "rendering table"
        );

        let mut headers = Vec::with_capacity(self.columns.len());
        let mut body_aligns = Vec::with_capacity(self.columns.len());
        for (desc, &col) in self.columns.iter().zip(&sources) {
            let auto = auto_alignment(self.dataset, col, &desc.transform);
            tracing::trace!(source = %desc.source, key = desc.key(), ?auto, "resolved column");
            headers.push(HeaderCell {
                label: desc.header_label().to_string(),
                align: desc.header_align.unwrap_or(auto),
                footnote_marks: Vec::new(),
                width_px: desc.width_px,
            });
            body_aligns.push(desc.body_align.unwrap_or(auto));
        }

        let mut rows: Vec<Vec<BodyCell>> = (0..self.dataset.row_count())
            .map(|r| {
                let values = self.dataset.row(r).unwrap_or_default();
                self.columns
                    .iter()
                    .zip(&sources)
                    .zip(&body_aligns)
                    .map(|((desc, &col), &align)| BodyCell {
                        content: render_value(desc, &values[col]),
                        align,
                        footnote_marks: Vec::new(),
                    })
                    .collect()
            })
            .collect();

        let spanners = resolve_spanners(&self.columns, &self.spanners)?;
        let footnotes = attach_footnotes(&self.columns, &self.footnotes, &mut headers, &mut rows)?;

        tracing::debug!(rows = rows.len(), "table rendered");
        Ok(RenderModel::from_parts(ModelParts {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            spanners,
            headers,
            rows,
            footnotes,
            source_notes: self.source_notes.clone(),
        }))
    }
}

/// Dataset column index for every descriptor, in spec order.
fn resolve_sources(dataset: &Dataset, columns: &ColumnSpec) -> Result<Vec<usize>> {
    columns
        .iter()
        .map(|desc| {
            dataset
                .column_index(&desc.source)
                .ok_or_else(|| TabkitError::unknown_column(&desc.source))
        })
        .collect()
}

/// Images are centered; columns whose present values are all numeric are
/// right-aligned; everything else is left-aligned.
fn auto_alignment(dataset: &Dataset, col: usize, transform: &Transform) -> Alignment {
    if transform.is_image() {
        return Alignment::Center;
    }
    let mut present = (0..dataset.row_count())
        .filter_map(|r| dataset.row(r).map(|row| &row[col]))
        .filter(|v| !v.is_missing())
        .peekable();
    if present.peek().is_none() {
        return Alignment::Left;
    }
    if present.all(Scalar::is_numeric) {
        Alignment::Right
    } else {
        Alignment::Left
    }
}

fn image_ref(source: &ImageSource, raw: &Scalar) -> ImageRef {
    ImageRef {
        path: source.resolve(&raw.to_string()),
        height_px: source.height_px,
    }
}

/// Render one raw value through a descriptor.
fn render_value(desc: &ColumnDescriptor, raw: &Scalar) -> CellContent {
    if raw.is_missing() {
        return CellContent::Text(desc.missing_placeholder().to_string());
    }
    match &desc.transform {
        Transform::Identity => CellContent::Text(raw.to_string()),
        // Non-numeric values pass through untouched.
        Transform::Number(format) => {
            CellContent::Text(format.apply(raw).unwrap_or_else(|| raw.to_string()))
        }
        Transform::Image(source) => CellContent::Image(image_ref(source, raw)),
        Transform::ImageWithLabel { image, label_first } => {
            let img = Fragment::Image(image_ref(image, raw));
            let label = Fragment::Text(raw.to_string());
            CellContent::Composite(if *label_first {
                vec![label, img]
            } else {
                vec![img, label]
            })
        }
    }
}

fn resolve_spanners(columns: &ColumnSpec, spanners: &[Spanner]) -> Result<Vec<SpannerCell>> {
    let mut covered = vec![false; columns.len()];
    let mut cells = Vec::with_capacity(spanners.len());

    for spanner in spanners {
        let mut positions = spanner
            .columns
            .iter()
            .map(|key| {
                columns
                    .position(key)
                    .ok_or_else(|| TabkitError::unknown_column(key))
            })
            .collect::<Result<Vec<usize>>>()?;
        positions.sort_unstable();
        positions.dedup();

        let (Some(&start), Some(&end)) = (positions.first(), positions.last()) else {
            return Err(TabkitError::config(format!(
                "spanner '{}' covers no columns",
                spanner.label
            )));
        };
        if end - start + 1 != positions.len() {
            return Err(TabkitError::config(format!(
                "spanner '{}' covers columns that are not adjacent",
                spanner.label
            )));
        }
        if covered[start..=end].iter().any(|&c| c) {
            return Err(TabkitError::config(format!(
                "spanner '{}' overlaps another spanner",
                spanner.label
            )));
        }
        covered[start..=end].iter_mut().for_each(|c| *c = true);

        cells.push(SpannerCell {
            label: spanner.label.clone(),
            start,
            span: positions.len(),
        });
    }

    cells.sort_by_key(|c| c.start);
    Ok(cells)
}

/// Validate footnote targets, place marks on cells and collect definitions.
///
/// Marks are explicit when given, otherwise numbered 1, 2, 3... over the
/// unmarked footnotes. Definitions keep input order and are never merged.
fn attach_footnotes(
    columns: &ColumnSpec,
    footnotes: &[Footnote],
    headers: &mut [HeaderCell],
    rows: &mut [Vec<BodyCell>],
) -> Result<Vec<FootnoteDef>> {
    let mut next_number = 1usize;
    let mut defs = Vec::with_capacity(footnotes.len());

    for note in footnotes {
        let column = note.location.column();
        let col = columns
            .position(column)
            .ok_or_else(|| TabkitError::FootnoteTarget {
                column: column.to_string(),
                row: note.location.row(),
                reason: "no column with this key".to_string(),
            })?;

        let mark = match &note.mark {
            Some(mark) => mark.clone(),
            None => {
                let mark = next_number.to_string();
                next_number += 1;
                mark
            }
        };

        match &note.location {
            FootnoteLocation::Header { .. } => headers[col].footnote_marks.push(mark.clone()),
            FootnoteLocation::Body { row, .. } => {
                let row_count = rows.len();
                let cells = rows.get_mut(*row).ok_or_else(|| TabkitError::FootnoteTarget {
                    column: column.to_string(),
                    row: Some(*row),
                    reason: format!("row out of range (table has {} rows)", row_count),
                })?;
                cells[col].footnote_marks.push(mark.clone());
            }
        }

        defs.push(FootnoteDef {
            mark,
            text: note.text.clone(),
        });
    }

    Ok(defs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NumberFormat;

    fn sample() -> Dataset {
        Dataset::new(
            ["Rank", "Model", "Time"],
            vec![
                vec![1.into(), "A".into(), 2.0.into()],
                vec![2.into(), "B".into(), 2.5.into()],
                vec![3.into(), "C".into(), 3.1.into()],
            ],
        )
        .unwrap()
    }

    fn texts(model: &RenderModel) -> Vec<Vec<String>> {
        model
            .rows()
            .iter()
            .map(|r| r.iter().map(|c| c.content.plain_text()).collect())
            .collect()
    }

    #[test]
    fn test_select_subset() {
        let data = sample();
        let spec = ColumnSpec::new()
            .column(ColumnDescriptor::new("Rank"))
            .column(ColumnDescriptor::new("Model").align(Alignment::Left));
        let model = render(&data, &spec, &[]).unwrap();

        assert_eq!(model.headers().len(), 2);
        assert_eq!(model.headers()[0].label, "Rank");
        assert_eq!(model.headers()[1].label, "Model");
        assert_eq!(
            texts(&model),
            vec![vec!["1", "A"], vec!["2", "B"], vec!["3", "C"]]
        );
    }

    #[test]
    fn test_auto_alignment() {
        let data = sample();
        let model = render(&data, &ColumnSpec::select(["Rank", "Model", "Time"]), &[]).unwrap();
        assert_eq!(model.headers()[0].align, Alignment::Right);
        assert_eq!(model.headers()[1].align, Alignment::Left);
        assert_eq!(model.cell(0, 2).unwrap().align, Alignment::Right);
    }

    #[test]
    fn test_auto_alignment_all_missing_is_left() {
        let data = Dataset::new(["x"], vec![vec![Scalar::Missing]]).unwrap();
        let model = render(&data, &ColumnSpec::select(["x"]), &[]).unwrap();
        assert_eq!(model.headers()[0].align, Alignment::Left);
    }

    #[test]
    fn test_scoped_alignment() {
        let data = sample();
        let spec = ColumnSpec::new()
            .column(ColumnDescriptor::new("Time").align_header(Alignment::Center))
            .column(ColumnDescriptor::new("Model").align_body(Alignment::Right));
        let model = render(&data, &spec, &[]).unwrap();

        assert_eq!(model.headers()[0].align, Alignment::Center);
        assert_eq!(model.cell(0, 0).unwrap().align, Alignment::Right);
        assert_eq!(model.headers()[1].align, Alignment::Left);
        assert_eq!(model.cell(0, 1).unwrap().align, Alignment::Right);
    }

    #[test]
    fn test_header_and_body_alignment_together() {
        let data = sample();
        let spec = ColumnSpec::new().column(
            ColumnDescriptor::new("Model")
                .align_header(Alignment::Center)
                .align_body(Alignment::Right),
        );
        let model = render(&data, &spec, &[]).unwrap();

        assert_eq!(model.headers()[0].align, Alignment::Center);
        assert!(model.rows().iter().all(|r| r[0].align == Alignment::Right));
    }

    #[test]
    fn test_oversized_decimals_rejected() {
        let data = sample();
        let spec = ColumnSpec::new()
            .column(ColumnDescriptor::new("Time").number(NumberFormat::new().decimals(100_000)));
        let err = render(&data, &spec, &[]).unwrap_err();
        assert!(matches!(err, TabkitError::Configuration(_)));
    }

    #[test]
    fn test_number_format_passthrough_on_text() {
        let data = sample();
        let spec = ColumnSpec::new()
            .column(ColumnDescriptor::new("Time").number(NumberFormat::new().decimals(1)))
            .column(ColumnDescriptor::new("Model").number(NumberFormat::new()));
        let model = render(&data, &spec, &[]).unwrap();
        assert_eq!(
            texts(&model),
            vec![vec!["2.0", "A"], vec!["2.5", "B"], vec!["3.1", "C"]]
        );
    }

    #[test]
    fn test_missing_placeholder() {
        let data = Dataset::new(
            ["a", "b"],
            vec![vec![Scalar::Missing, 1.into()], vec![2.into(), Scalar::Missing]],
        )
        .unwrap();
        let spec = ColumnSpec::new()
            .column(ColumnDescriptor::new("a").missing_text("n/a"))
            .column(ColumnDescriptor::new("b").number(NumberFormat::integer()));
        let model = render(&data, &spec, &[]).unwrap();
        assert_eq!(texts(&model), vec![vec!["n/a", "1"], vec!["2", "—"]]);
    }

    #[test]
    fn test_image_transforms() {
        let data = Dataset::new(["country"], vec![vec!["se".into()], vec![Scalar::Missing]])
            .unwrap();
        let spec = ColumnSpec::new()
            .column(ColumnDescriptor::new("country").image(ImageSource::new("flags/{}.png").height(20)))
            .column(
                ColumnDescriptor::new("country")
                    .with_id("labelled")
                    .image_with_label(ImageSource::new("flags/{}.png"), false),
            );
        let model = render(&data, &spec, &[]).unwrap();

        assert_eq!(
            model.cell(0, 0).unwrap().content,
            CellContent::Image(ImageRef {
                path: "flags/se.png".into(),
                height_px: Some(20),
            })
        );
        assert_eq!(
            model.cell(0, 1).unwrap().content,
            CellContent::Composite(vec![
                Fragment::Image(ImageRef {
                    path: "flags/se.png".into(),
                    height_px: None,
                }),
                Fragment::Text("se".into()),
            ])
        );
        assert_eq!(model.headers()[0].align, Alignment::Center);
        assert_eq!(model.cell(1, 0).unwrap().content, CellContent::Text("—".into()));
    }

    #[test]
    fn test_empty_dataset_columns_rejected() {
        let data = Dataset::new(Vec::<String>::new(), vec![]).unwrap();
        let err = render(&data, &ColumnSpec::select(["a"]), &[]).unwrap_err();
        assert!(matches!(err, TabkitError::Configuration(_)));
    }

    #[test]
    fn test_empty_spec_rejected() {
        let err = render(&sample(), &ColumnSpec::new(), &[]).unwrap_err();
        assert!(matches!(err, TabkitError::Configuration(_)));
    }

    #[test]
    fn test_zero_rows() {
        let data = Dataset::new(["a", "b"], vec![]).unwrap();
        let model = render(&data, &ColumnSpec::select(["b", "a"]), &[]).unwrap();
        assert_eq!(model.column_count(), 2);
        assert_eq!(model.row_count(), 0);
        assert_eq!(model.headers()[0].align, Alignment::Left);
    }

    #[test]
    fn test_unknown_column() {
        let err = render(&sample(), &ColumnSpec::select(["Rank", "Speed"]), &[]).unwrap_err();
        match err {
            TabkitError::UnknownColumn { column } => assert_eq!(column, "Speed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_footnote_marks() {
        let spec = ColumnSpec::select(["Rank", "Model", "Time"]);
        let notes = [
            Footnote::header("Time", "seconds"),
            Footnote::body("Time", 1, "estimated").with_mark("*"),
            Footnote::body("Time", 1, "estimated"),
        ];
        let model = render(&sample(), &spec, &notes).unwrap();

        assert_eq!(model.headers()[2].footnote_marks, vec!["1"]);
        assert_eq!(model.cell(1, 2).unwrap().footnote_marks, vec!["*", "2"]);
        let defs: Vec<_> = model.footnotes().iter().map(|d| (d.mark.as_str(), d.text.as_str())).collect();
        assert_eq!(
            defs,
            vec![("1", "seconds"), ("*", "estimated"), ("2", "estimated")]
        );
    }

    #[test]
    fn test_footnote_out_of_range() {
        let spec = ColumnSpec::select(["Rank", "Model", "Time"]);
        assert!(render(&sample(), &spec, &[Footnote::body("Time", 1, "ok")]).is_ok());

        let err = render(&sample(), &spec, &[Footnote::body("Time", 99, "bad")]).unwrap_err();
        assert!(matches!(
            err,
            TabkitError::FootnoteTarget { row: Some(99), .. }
        ));
    }

    #[test]
    fn test_footnote_unknown_column() {
        let spec = ColumnSpec::select(["Rank"]);
        let err = render(&sample(), &spec, &[Footnote::header("Time", "x")]).unwrap_err();
        assert!(matches!(err, TabkitError::FootnoteTarget { row: None, .. }));
    }

    #[test]
    fn test_spanners() {
        let spec = ColumnSpec::select(["Rank", "Model", "Time"]);
        let model = TableRenderer::new(&sample(), spec.clone())
            .spanner(Spanner::new("Run", ["Time", "Model"]))
            .render()
            .unwrap();
        assert_eq!(
            model.spanners(),
            &[SpannerCell {
                label: "Run".into(),
                start: 1,
                span: 2,
            }]
        );

        let gap = TableRenderer::new(&sample(), spec.clone())
            .spanner(Spanner::new("Gap", ["Rank", "Time"]))
            .render();
        assert!(matches!(gap, Err(TabkitError::Configuration(_))));

        let overlap = TableRenderer::new(&sample(), spec.clone())
            .spanner(Spanner::new("A", ["Rank", "Model"]))
            .spanner(Spanner::new("B", ["Model", "Time"]))
            .render();
        assert!(matches!(overlap, Err(TabkitError::Configuration(_))));

        let unknown = TableRenderer::new(&sample(), spec)
            .spanner(Spanner::new("X", ["Speed"]))
            .render();
        assert!(matches!(unknown, Err(TabkitError::UnknownColumn { .. })));
    }

    #[test]
    fn test_builder_steps_do_not_share_state() {
        let data = sample();
        let base = TableRenderer::new(&data, ColumnSpec::select(["Rank"]));
        let titled = base.clone().title("Ranking");
        let extended = base.clone().column(ColumnDescriptor::new("Model"));

        assert_eq!(base.render().unwrap().title(), None);
        assert_eq!(base.render().unwrap().column_count(), 1);
        assert_eq!(titled.render().unwrap().title(), Some("Ranking"));
        assert_eq!(extended.render().unwrap().column_count(), 2);
        assert_eq!(base.render().unwrap(), base.render().unwrap());
    }
}
