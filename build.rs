use std::process::Command;

const INPUT_CSS: &str = "assets/css/input.css";
const OUTPUT_CSS: &str = "assets/css/output.css";

/// Hand-written stand-in for the Tailwind build. Holds exactly the
/// utilities and components the templates use.
const FALLBACK_CSS: &str = r#"*, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, -apple-system, sans-serif; line-height: 1.6; color: #1c1917; }
a { color: inherit; text-decoration: none; }
summary { cursor: pointer; }
.min-h-screen { min-height: 100vh; }
.mx-auto { margin-left: auto; margin-right: auto; }
.max-w-xl { max-width: 36rem; }
.px-4 { padding-left: 1rem; padding-right: 1rem; }
.py-3 { padding-top: 0.75rem; padding-bottom: 0.75rem; }
.py-6 { padding-top: 1.5rem; padding-bottom: 1.5rem; }
.py-8 { padding-top: 2rem; padding-bottom: 2rem; }
.py-16 { padding-top: 4rem; padding-bottom: 4rem; }
.p-6 { padding: 1.5rem; }
.mb-2 { margin-bottom: 0.5rem; }
.mb-4 { margin-bottom: 1rem; }
.mb-8 { margin-bottom: 2rem; }
.ml-2 { margin-left: 0.5rem; }
.ml-auto { margin-left: auto; }
.mt-1 { margin-top: 0.25rem; }
.mt-16 { margin-top: 4rem; }
.flex { display: flex; }
.inline-flex { display: inline-flex; }
.flex-shrink-0 { flex-shrink: 0; }
.items-center { align-items: center; }
.justify-center { justify-content: center; }
.justify-between { justify-content: space-between; }
.gap-3 { gap: 0.75rem; }
.gap-4 { gap: 1rem; }
.w-8 { width: 2rem; }
.h-8 { height: 2rem; }
.text-center { text-align: center; }
.text-xs { font-size: 0.75rem; }
.text-sm { font-size: 0.875rem; }
.text-lg { font-size: 1.125rem; }
.text-xl { font-size: 1.25rem; }
.font-medium { font-weight: 500; }
.font-semibold { font-weight: 600; }
.font-bold { font-weight: 700; }
.whitespace-pre-wrap { white-space: pre-wrap; }
.text-stone-400 { color: #a8a29e; }
.text-stone-500 { color: #78716c; }
.text-stone-600 { color: #57534e; }
.text-stone-700 { color: #44403c; }
.text-stone-900 { color: #1c1917; }
.bg-white { background-color: #fff; }
.bg-stone-50 { background-color: #fafaf9; }
.bg-stone-200 { background-color: #e7e5e4; }
.border { border: 1px solid; }
.border-b { border-bottom: 1px solid; }
.border-t { border-top: 1px solid; }
.border-stone-100 { border-color: #f5f5f4; }
.border-stone-200 { border-color: #e7e5e4; }
.border-stone-300 { border-color: #d6d3d1; }
.rounded-lg { border-radius: 0.5rem; }
.rounded-full { border-radius: 9999px; }
.btn { display: inline-flex; align-items: center; justify-content: center; padding: 0.5rem 1rem; border-radius: 0.5rem; font-size: 0.875rem; font-weight: 500; cursor: pointer; }
.btn-primary { background: #1c1917; color: #fff; border: none; }
.btn-primary:hover { background: #44403c; }
.btn-secondary { background: #fff; color: #1c1917; border: 1px solid #d6d3d1; }
.btn-secondary:hover { background: #f5f5f4; }
.card { background: #fff; border: 1px solid #e7e5e4; border-radius: 0.75rem; padding: 1.5rem; }
.card .card { border: none; padding: 0; }
form label { display: block; margin-bottom: 0.75rem; }
form label input, form label textarea { display: block; width: 100%; margin-top: 0.25rem; padding: 0.5rem; border: 1px solid #d6d3d1; border-radius: 0.5rem; font: inherit; }
"#;

fn main() {
    // Templates are Tailwind's content source
    println!("cargo:rerun-if-changed={}", INPUT_CSS);
    println!("cargo:rerun-if-changed=templates/");
    println!("cargo:rerun-if-changed=tailwind.config.js");

    if compile_tailwind() {
        return;
    }

    println!("cargo:warning=tailwindcss unavailable, writing fallback stylesheet");
    if let Err(e) =
        std::fs::create_dir_all("assets/css").and_then(|_| std::fs::write(OUTPUT_CSS, FALLBACK_CSS))
    {
        println!("cargo:warning=could not write {}: {}", OUTPUT_CSS, e);
    }
}

/// Run the standalone Tailwind CLI. False when it is missing or fails.
fn compile_tailwind() -> bool {
    let status = Command::new("tailwindcss")
        .args([
            "-i",
            INPUT_CSS,
            "-o",
            OUTPUT_CSS,
            "-c",
            "tailwind.config.js",
            "--minify",
        ])
        .status();

    matches!(status, Ok(s) if s.success())
}
