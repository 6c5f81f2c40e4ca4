use crate::error::{TemplateError, TemplateResult};
use crate::excel::{TemplateBuilder, TemplateInspector, TemplateReport};
use crate::layout::{self, DATA_SHEET, LOOKUP_SHEET};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Default template location relative to the repository root
pub fn default_output_path(repo_root: &Path) -> PathBuf {
    repo_root
        .join("模板与示例")
        .join("财务模板")
        .join("商品利润率模板.xlsx")
}

/// Execute the generate command
pub fn generate(
    output: Option<PathBuf>,
    repo_root: Option<PathBuf>,
    verbose: bool,
) -> TemplateResult<()> {
    let repo_root = repo_root.unwrap_or_else(|| PathBuf::from("."));
    let output = output.unwrap_or_else(|| default_output_path(&repo_root));

    let builder = TemplateBuilder::from_repo(&repo_root);

    if verbose {
        println!("{}", "📖 Store archive".cyan());
        println!("   Repo root: {}", repo_root.display());
        for store in builder.stores() {
            println!("   • {}", store);
        }
        println!("   Store dropdown:    {}", builder.store_validation_source());
        println!("   Category dropdown: {}\n", builder.category_validation_source());
    }

    builder.build(&output)?;

    println!("{} {}", "模板已生成:".bold().green(), output.display());
    Ok(())
}

/// Execute the inspect command
pub fn inspect(file: PathBuf, json: bool, verbose: bool) -> TemplateResult<()> {
    let report = TemplateInspector::new(&file).inspect()?;

    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(|e| {
            TemplateError::Validation(format!("Failed to serialize report: {}", e))
        })?;
        println!("{}", rendered);
    } else {
        print_report(&file, &report, verbose);
    }

    if report.is_well_formed() {
        Ok(())
    } else {
        Err(TemplateError::Validation(report.problems().join("; ")))
    }
}

fn print_report(file: &Path, report: &TemplateReport, verbose: bool) {
    println!("{}", "🔍 Template Inspection".bold().green());
    println!("   File: {}\n", file.display());

    println!(
        "   {}: {} / {} header columns",
        DATA_SHEET,
        report.headers.len(),
        layout::Field::ALL.len()
    );
    println!(
        "   Formula cells: {} / {}",
        report.formula_cells,
        TemplateReport::expected_formula_cells()
    );
    println!(
        "   {}: {} stores, {} categories",
        LOOKUP_SHEET,
        report.stores.len(),
        report.categories.len()
    );

    if verbose {
        println!("\n   Headers: {}", report.headers.join(" | "));
        println!("   Stores: {}", report.stores.join(", "));
        println!("   Categories: {}", report.categories.join(", "));
    }

    println!();
    if report.is_well_formed() {
        println!("{}", "✅ Template layout is valid".bold().green());
    } else {
        println!("{}", "❌ Template layout is invalid".bold().red());
        for problem in report.problems() {
            println!("   • {}", problem.yellow());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("/repo"));
        assert_eq!(
            path,
            PathBuf::from("/repo/模板与示例/财务模板/商品利润率模板.xlsx")
        );
    }

    #[test]
    fn test_generate_with_explicit_paths() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out").join("template.xlsx");

        let result = generate(
            Some(output.clone()),
            Some(temp_dir.path().to_path_buf()),
            true,
        );

        assert!(result.is_ok());
        assert!(output.exists());
    }

    #[test]
    fn test_generate_defaults_output_under_repo_root() {
        let temp_dir = TempDir::new().unwrap();

        generate(None, Some(temp_dir.path().to_path_buf()), false).unwrap();

        assert!(default_output_path(temp_dir.path()).exists());
    }

    #[test]
    fn test_inspect_generated_template() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("template.xlsx");
        generate(Some(output.clone()), Some(temp_dir.path().to_path_buf()), false).unwrap();

        assert!(inspect(output.clone(), false, true).is_ok());
        assert!(inspect(output, true, false).is_ok());
    }

    #[test]
    fn test_inspect_missing_file() {
        let result = inspect(PathBuf::from("/nonexistent/template.xlsx"), false, false);
        assert!(result.is_err());
    }
}
