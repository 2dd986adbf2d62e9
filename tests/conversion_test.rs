use anyhow::Result;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use sc_formatter::adapters::writer::{is_output_file_name, SKIPPED_SHEET};
use sc_formatter::{ConversionEngine, KeywordConfig, LocalStorage, SheetFormatterPipeline};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONFIG: &str = r#"{
    "source": ["Source IP", "來源"],
    "destination": ["Destination IP", "目的"],
    "service": ["Service", "Port"],
    "remove": "Remove",
    "add": "Add",
    "comment": "Comment",
    "service_replace": {"HTTPS": "TCP 443"}
}"#;

enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

fn write_sheet(workbook: &mut Workbook, name: &str, rows: &[Vec<Cell>]) -> Result<()> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name)?;
    for (r, cells) in rows.iter().enumerate() {
        for (c, cell) in cells.iter().enumerate() {
            match cell {
                Cell::Text("") => {}
                Cell::Text(text) => {
                    worksheet.write_string(r as u32, c as u16, *text)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(r as u32, c as u16, *n)?;
                }
            }
        }
    }
    Ok(())
}

fn text_row(cells: &[&'static str]) -> Vec<Cell<'static>> {
    cells.iter().map(|c| Cell::Text(*c)).collect()
}

fn setup_directory() -> Result<TempDir> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("config.json"), CONFIG)?;

    let mut workbook = Workbook::new();
    write_sheet(
        &mut workbook,
        "Rules",
        &[
            text_row(&["No", "Source IP", "Destination IP", "Service", "Remove", "Add", "Comment"]),
            vec![
                Cell::Number(1.0),
                Cell::Text("10.0.0.1;10.0.0.2"),
                Cell::Text("192.168.1.10"),
                Cell::Number(22.0),
                Cell::Text(""),
                Cell::Text("V"),
                Cell::Text("CR-100"),
            ],
            text_row(&["2", "10.0.0.3\n10.0.0.4", "192.168.1.11", "UDP 514;https", "V", "", ""]),
            text_row(&["3", "", "", "", "", "", ""]),
            text_row(&["4", "10.0.0.5", "", "22", "", "", ""]),
            text_row(&["5", "10.0.0.6", "192.168.1.12", "80", "V", "V", ""]),
            text_row(&["6", "10.0.0.7", "192.168.1.13", "ftp", "", "", ""]),
        ],
    )?;
    write_sheet(
        &mut workbook,
        "Notes",
        &[text_row(&["Owner", "Team"]), text_row(&["alice", "netops"])],
    )?;
    workbook.save(temp_dir.path().join("request.xlsx"))?;

    let mut second = Workbook::new();
    write_sheet(
        &mut second,
        "申請單",
        &[
            text_row(&["防火牆變更申請", "", ""]),
            text_row(&["來源", "目的", "Port"]),
            text_row(&["172.16.0.1", "172.16.0.2", "tcp 8443"]),
        ],
    )?;
    second.save(temp_dir.path().join("second.xlsx"))?;

    // 舊格式與暫存檔都應忽略
    std::fs::write(temp_dir.path().join("legacy.xls"), b"legacy")?;
    std::fs::write(temp_dir.path().join("~$request.xlsx"), b"lock")?;

    Ok(temp_dir)
}

fn run_once(dir: &Path) -> Result<sc_formatter::core::etl::RunSummary> {
    let keywords = KeywordConfig::from_file(dir.join("config.json"))?;
    let pipeline = SheetFormatterPipeline::new(LocalStorage::new(dir), keywords, dir);
    Ok(ConversionEngine::new(pipeline).run()?)
}

fn output_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(is_output_file_name)
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

fn strings(range: &Range<Data>) -> Vec<Vec<String>> {
    range
        .rows()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

#[test]
fn test_end_to_end_conversion() -> Result<()> {
    let temp_dir = setup_directory()?;

    let summary = run_once(temp_dir.path())?;

    assert_eq!(summary.workbooks, 2);
    assert_eq!(summary.accepted, 3);
    // Notes 工作表 + 第 5、6、7 列
    assert_eq!(summary.skipped, 4);

    let outputs = output_files(temp_dir.path())?;
    assert_eq!(outputs.len(), 1);
    assert_eq!(summary.output_path, outputs[0].display().to_string());

    let mut workbook: Xlsx<_> = open_workbook(&outputs[0])?;
    assert_eq!(workbook.sheet_names(), vec!["Rules", "申請單", SKIPPED_SHEET]);

    let rules = strings(&workbook.worksheet_range("Rules")?);
    assert_eq!(rules[0], vec!["Source", "Destination", "Service", "Action", "Comment"]);
    assert_eq!(
        rules[1],
        vec!["10.0.0.1; 10.0.0.2", "192.168.1.10", "TCP 22", "accept", "CR-100"]
    );
    assert_eq!(
        rules[2],
        vec!["10.0.0.3; 10.0.0.4", "192.168.1.11", "UDP 514; TCP 443", "remove", ""]
    );
    assert_eq!(rules.len(), 3);

    let second = strings(&workbook.worksheet_range("申請單")?);
    assert_eq!(second[1], vec!["172.16.0.1", "172.16.0.2", "TCP 8443", "", ""]);

    let skipped = strings(&workbook.worksheet_range(SKIPPED_SHEET)?);
    assert_eq!(skipped.len(), 5);
    assert_eq!(skipped[1][0], "request.xlsx");
    assert_eq!(skipped[1][1], "Rules");
    assert_eq!(skipped[1][2], "5");
    assert_eq!(skipped[1][3], "Miss destination 'Destination IP'");
    assert_eq!(skipped[2][3], "Have Both ('Add'&'Remove')");
    assert_eq!(skipped[3][3], "Unparseable service 'ftp'");
    assert_eq!(skipped[4][1], "Notes");
    assert_eq!(skipped[4][2], "");
    assert!(skipped[4][3].starts_with("Missing keywords: source"));

    Ok(())
}

#[test]
fn test_runs_are_idempotent() -> Result<()> {
    let temp_dir = setup_directory()?;

    let first = run_once(temp_dir.path())?;
    let second = run_once(temp_dir.path())?;

    assert_ne!(first.output_path, second.output_path);
    assert_eq!(first.workbooks, second.workbooks);
    assert_eq!(first.accepted, second.accepted);
    assert_eq!(first.skipped, second.skipped);

    let outputs = output_files(temp_dir.path())?;
    assert_eq!(outputs.len(), 2);

    let mut contents = Vec::new();
    for path in &outputs {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            sheets.push((name.clone(), strings(&workbook.worksheet_range(&name)?)));
        }
        contents.push(sheets);
    }
    assert_eq!(contents[0], contents[1]);

    Ok(())
}

#[test]
fn test_directory_without_matching_sheets() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("config.json"), CONFIG)?;

    let mut workbook = Workbook::new();
    write_sheet(
        &mut workbook,
        "Inventory",
        &[text_row(&["Host", "Owner"]), text_row(&["fw01", "netops"])],
    )?;
    workbook.save(temp_dir.path().join("inventory.xlsx"))?;

    let summary = run_once(temp_dir.path())?;

    assert_eq!(summary.accepted, 0);
    assert_eq!(summary.skipped, 1);

    let mut output: Xlsx<_> = open_workbook(&summary.output_path)?;
    assert_eq!(output.sheet_names(), vec![SKIPPED_SHEET]);
    let skipped = strings(&output.worksheet_range(SKIPPED_SHEET)?);
    assert_eq!(skipped[1][1], "Inventory");

    Ok(())
}

#[test]
fn test_missing_config_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let err = KeywordConfig::from_file(temp_dir.path().join("config.json")).unwrap_err();

    assert!(err.is_fatal());
    assert!(output_files(temp_dir.path())?.is_empty());
    Ok(())
}
