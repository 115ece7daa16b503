use pictureshow::*;
use std::path::{Path, PathBuf};

/// Backend call, as recorded by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Init(PageSize, Option<Rgb>),
    AddPage,
    AddPicture {
        name: String,
        position: (f32, f32),
        size: (f32, f32),
    },
    Save,
}

/// Fake backend that records every call instead of rendering.
///
/// Input names decide the outcome of `read_picture`: `bad*` is
/// unreadable, `missing*` is an I/O error, `fatal*` is a non-recoverable
/// error. Everything else is a 200x100 picture.
#[derive(Default)]
struct RecordingBackend {
    calls: Vec<Call>,
    page_has_content: bool,
    pages_with_content: usize,
}

impl RecordingBackend {
    fn placed(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::AddPicture { .. }))
            .collect()
    }

    fn count(&self, wanted: &Call) -> usize {
        self.calls.iter().filter(|call| *call == wanted).count()
    }
}

impl Backend for RecordingBackend {
    type Picture = String;

    fn init(&mut self, _output: &Path, page_size: PageSize, bg_color: Option<Rgb>) -> Result<()> {
        self.calls.push(Call::Init(page_size, bg_color));
        self.pages_with_content = 0;
        Ok(())
    }

    fn add_page(&mut self) -> Result<()> {
        self.calls.push(Call::AddPage);
        if self.page_has_content {
            self.pages_with_content += 1;
        }
        self.page_has_content = false;
        Ok(())
    }

    fn read_picture(&mut self, picture: &Path) -> std::result::Result<String, ReadError> {
        let name = picture.to_string_lossy().into_owned();
        if name.starts_with("bad") {
            Err(ReadError::Unidentified(format!("cannot identify image file '{name}'")))
        } else if name.starts_with("missing") {
            Err(ReadError::Io(std::io::ErrorKind::NotFound.into()))
        } else if name.starts_with("fatal") {
            Err(ReadError::Other("decoder limit exceeded".to_string()))
        } else {
            Ok(name)
        }
    }

    fn picture_size(&self, _picture: &String) -> (f32, f32) {
        (200.0, 100.0)
    }

    fn add_picture(&mut self, picture: String, position: (f32, f32), size: (f32, f32)) -> Result<()> {
        self.calls.push(Call::AddPicture {
            name: picture,
            position,
            size,
        });
        self.page_has_content = true;
        Ok(())
    }

    fn save(&mut self) -> Result<usize> {
        self.calls.push(Call::Save);
        if self.page_has_content {
            self.pages_with_content += 1;
        }
        Ok(self.pages_with_content)
    }
}

fn pictures(names: &[&str]) -> PictureShow {
    PictureShow::new(names.iter().copied())
}

fn options(layout: &str) -> SaveOptions {
    SaveOptions {
        page_size: (1000.0, 1000.0).into(),
        layout: layout.into(),
        margin: 0.0,
        ..Default::default()
    }
}

fn run(show: &PictureShow, options: &SaveOptions) -> (BatchResult, RecordingBackend) {
    let dir = tempfile::tempdir().unwrap();
    let mut pagination = show
        .paginate(RecordingBackend::default(), dir.path().join("out.pdf"), options)
        .unwrap();
    while pagination.step().unwrap() != Step::Done {}

    let calls = RecordingBackend {
        calls: pagination.backend().calls.clone(),
        ..Default::default()
    };
    (pagination.into_result(), calls)
}

const SIX: [&str; 6] = ["1.png", "2.png", "3.png", "4.png", "5.png", "6.png"];

#[test]
fn test_six_pictures_page_counts() {
    for (layout, expected_pages, expected_breaks) in [("1x1", 6, 5), ("3x2", 1, 0), ("1x3", 2, 1)] {
        let (result, backend) = run(&pictures(&SIX), &options(layout));

        assert_eq!(result.num_ok, 6, "{layout}");
        assert!(result.errors.is_empty());
        assert_eq!(result.num_pages, expected_pages, "{layout}");
        assert_eq!(backend.count(&Call::AddPage), expected_breaks, "{layout}");
        assert_eq!(backend.count(&Call::Save), 1);
    }
}

#[test]
fn test_full_last_page_adds_no_blank_page() {
    let (result, backend) = run(&pictures(&SIX[..4]), &options("2x2"));
    assert_eq!(result.num_pages, 1);
    assert_eq!(backend.count(&Call::AddPage), 0);
    assert_eq!(backend.calls.last(), Some(&Call::Save));
}

#[test]
fn test_failures_do_not_consume_cells() {
    let show = pictures(&["bad1.txt", "a.png", "missing.png", "b.png", "bad2.txt"]);
    let (result, backend) = run(&show, &options("2x1"));

    assert_eq!(result.num_ok, 2);
    assert_eq!(result.num_pages, 1);
    assert_eq!(backend.count(&Call::AddPage), 0);

    let names: Vec<_> = result.errors.iter().map(|(path, _)| path.clone()).collect();
    assert_eq!(
        names,
        vec![
            PathBuf::from("bad1.txt"),
            PathBuf::from("missing.png"),
            PathBuf::from("bad2.txt")
        ]
    );
    assert_eq!(result.num_inputs(), 5);

    // a.png and b.png land in consecutive cells
    let placed = backend.placed();
    assert!(matches!(placed[0], Call::AddPicture { name, position, .. } if name == "a.png" && position.0 < 500.0));
    assert!(matches!(placed[1], Call::AddPicture { name, position, .. } if name == "b.png" && position.0 >= 500.0));
}

#[test]
fn test_all_unreadable_saves_nothing() {
    let (result, backend) = run(&pictures(&["bad1", "bad2", "missing"]), &options("1x1"));

    assert_eq!(result.num_ok, 0);
    assert_eq!(result.errors.len(), 3);
    assert_eq!(result.num_pages, 0);
    assert_eq!(backend.count(&Call::Save), 0);
}

#[test]
fn test_no_inputs_saves_nothing() {
    let (result, backend) = run(&pictures(&[]), &options("1x1"));
    assert_eq!(result.num_inputs(), 0);
    assert_eq!(result.num_pages, 0);
    assert_eq!(backend.count(&Call::Save), 0);
}

#[test]
fn test_counts_add_up() {
    let names = ["a", "bad", "b", "bad", "c", "missing", "d", "e"];
    for layout in ["1x1", "2x2", "3x1", "1x4"] {
        let (result, _) = run(&pictures(&names), &options(layout));
        assert_eq!(result.num_ok + result.errors.len(), names.len());
        assert_eq!(result.num_ok, 5);
    }
}

#[test]
fn test_duplicate_failures_reported_once() {
    let (result, _) = run(&pictures(&["bad", "a", "bad", "bad"]), &options("1x1"));
    assert_eq!(result.errors.len(), 3);
    assert_eq!(result.unique_errors().len(), 1);
}

#[test]
fn test_picture_drawn_at_cell_origin_plus_box() {
    let show = pictures(&["a.png", "b.png"]);
    let options = SaveOptions {
        page_size: (620.0, 320.0).into(),
        layout: "2x1".into(),
        margin: 10.0,
        ..Default::default()
    };
    let (_, backend) = run(&show, &options);

    // Cells are 295x300; a 200x100 picture keeps its size and is centered
    let placed = backend.placed();
    assert_eq!(
        placed[0],
        &Call::AddPicture {
            name: "a.png".to_string(),
            position: (10.0 + 47.5, 10.0 + 100.0),
            size: (200.0, 100.0),
        }
    );
    assert_eq!(
        placed[1],
        &Call::AddPicture {
            name: "b.png".to_string(),
            position: (315.0 + 47.5, 10.0 + 100.0),
            size: (200.0, 100.0),
        }
    );
}

#[test]
fn test_fill_cell_and_stretch_small() {
    let show = pictures(&["a.png"]);
    let mut opts = options("1x1");

    opts.fill_cell = true;
    let (_, backend) = run(&show, &opts);
    assert!(matches!(backend.placed()[0], Call::AddPicture { size, .. } if *size == (1000.0, 1000.0)));

    opts.fill_cell = false;
    opts.stretch_small = true;
    let (_, backend) = run(&show, &opts);
    assert!(matches!(
        backend.placed()[0],
        Call::AddPicture { position, size, .. } if *size == (1000.0, 500.0) && *position == (0.0, 250.0)
    ));
}

#[test]
fn test_backend_initialized_with_options() {
    let options = SaveOptions {
        page_size: "LETTER".into(),
        landscape: true,
        bg_color: Some("ff0000".to_string()),
        ..Default::default()
    };
    let (_, backend) = run(&pictures(&["a"]), &options);
    assert_eq!(
        backend.calls[0],
        Call::Init(PageSize::new(792.0, 612.0), Some(Rgb::new(255, 0, 0)))
    );
}

#[test]
fn test_step_reports_positions() {
    let dir = tempfile::tempdir().unwrap();
    let show = pictures(&["a", "bad", "b", "c"]);
    let mut pagination = show
        .paginate(RecordingBackend::default(), dir.path().join("out.pdf"), &options("2x1"))
        .unwrap();

    let validated = pagination.options();
    assert_eq!(validated.layout, GridLayout { columns: 2, rows: 1 });
    assert_eq!(validated.cells.len(), 2);
    assert_eq!(validated.output, dir.path().join("out.pdf"));

    assert_eq!(pagination.step().unwrap(), Step::Placed { page: 1, cell: 0 });
    assert_eq!(pagination.step().unwrap(), Step::Skipped);
    assert_eq!(pagination.step().unwrap(), Step::Placed { page: 1, cell: 1 });
    assert_eq!(pagination.step().unwrap(), Step::Placed { page: 2, cell: 0 });
    assert_eq!(pagination.step().unwrap(), Step::Done);
    assert!(pagination.is_done());
    assert_eq!(pagination.step().unwrap(), Step::Done);

    let result = pagination.into_result();
    assert_eq!((result.num_ok, result.errors.len(), result.num_pages), (3, 1, 2));
}

#[test]
fn test_cancelled_run_is_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let show = pictures(&["a", "b", "c"]);
    let mut pagination = show
        .paginate(RecordingBackend::default(), dir.path().join("out.pdf"), &options("1x1"))
        .unwrap();

    pagination.step().unwrap();
    assert_eq!(pagination.num_ok(), 1);
    assert!(!pagination.is_done());
    assert_eq!(pagination.backend().count(&Call::Save), 0);

    let result = pagination.into_result();
    assert_eq!(result.num_ok, 1);
    assert_eq!(result.num_pages, 0);
}

#[test]
fn test_non_recoverable_error_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let show = pictures(&["a", "fatal.png", "b"]);
    let result = show.save_with(RecordingBackend::default(), dir.path().join("out.pdf"), &options("1x1"));

    match result {
        Err(PictureShowError::Read { path, source }) => {
            assert_eq!(path, PathBuf::from("fatal.png"));
            assert!(!source.is_recoverable());
        }
        other => panic!("Expected Read error, got {other:?}"),
    }
}

#[test]
fn test_validation_fails_before_init() {
    let dir = tempfile::tempdir().unwrap();
    let result = pictures(&["a"]).paginate(
        RecordingBackend::default(),
        dir.path().join("out.pdf"),
        &options("0x1"),
    );
    assert!(matches!(result, Err(PictureShowError::Layout(_))));
}

#[test]
fn test_iter_valid_yields_markers() {
    let mut backend = RecordingBackend::default();
    let mut iter = iter_valid(["a", "bad", "b"], &mut backend);

    assert!(matches!(iter.next(), Some(Ok(PictureItem::Picture(name))) if name == "a"));
    assert!(matches!(iter.next(), Some(Ok(PictureItem::Skipped))));
    assert!(matches!(iter.next(), Some(Ok(PictureItem::Picture(name))) if name == "b"));
    assert!(iter.next().is_none());

    let errors = iter.into_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, PathBuf::from("bad"));
    assert_eq!(errors[0].1.kind(), "UnreadablePicture");
}

#[test]
fn test_iter_valid_propagates_fatal_errors() {
    let mut backend = RecordingBackend::default();
    let mut iter = iter_valid(["fatal"], &mut backend);
    assert!(matches!(iter.next(), Some(Err(PictureShowError::Read { .. }))));
}
