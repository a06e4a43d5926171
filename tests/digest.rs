use std::path::Path;

use rigby::{format_module, LanguageParser, PythonParser};

fn digest(source: &str) -> (String, usize) {
    let module = PythonParser::new()
        .parse_module(source, Path::new("sample.py"))
        .expect("parse");
    let digest = format_module(&module);
    (digest.text(), digest.items_found)
}

#[test]
fn digest_function_with_docstring() {
    let (text, items) = digest(
        "def hello(name: str) -> str:\n    \"\"\"Greets the user.\"\"\"\n    return name\n",
    );
    assert_eq!(text, "FUNC hello(name:str) -> str: \"Greets the user.\"");
    assert_eq!(items, 1);
}

#[test]
fn digest_class_with_method() {
    let (text, items) = digest("class Dog(Animal):\n  def bark(self): pass\n");
    assert_eq!(text, "CLS Dog(Animal):\n  MTHD bark(self:?):");
    assert_eq!(items, 2);
}

#[test]
fn digest_module_variable_drops_value() {
    let (text, items) = digest("MAX_RETRIES: int = 5\n");
    assert_eq!(text, "VAR MAX_RETRIES: int");
    assert_eq!(items, 1);
}

#[test]
fn digest_parameter_categories() {
    let (text, _) = digest("def f(a, b=1, /, c: int = 2, *args: str, d, e=3, **kw: bool): pass\n");
    assert_eq!(
        text,
        "FUNC f(a:?,b:?=1,/,c:int=2,*args:str,d:?,e:?=3,**kw:bool):"
    );
}

#[test]
fn digest_default_offset() {
    let (text, _) = digest("def f(x, y, z=None): pass\n");
    assert_eq!(text, "FUNC f(x:?,y:?,z:?=None):");
}

#[test]
fn digest_async_cross_product() {
    let source = "\
async def top(): pass

class Service:
    def sync(self): pass
    async def fetch(self): pass
";
    let (text, items) = digest(source);
    assert_eq!(
        text,
        "ASYNC_FUNC top():\nCLS Service:\n  MTHD sync(self:?):\n  ASYNC_MTHD fetch(self:?):"
    );
    assert_eq!(items, 4);
}

#[test]
fn digest_long_docstring_is_truncated() {
    let long = "word ".repeat(40);
    let source = format!("def f():\n    \"\"\"{}\"\"\"\n", long);
    let (text, _) = digest(&source);
    let doc = text
        .strip_prefix("FUNC f(): \"")
        .and_then(|rest| rest.strip_suffix('"'))
        .expect("docstring");
    assert_eq!(doc.chars().count(), 100);
    assert!(doc.ends_with("..."));
}

#[test]
fn digest_ignores_nested_and_class_level_items() {
    let source = "\
class Outer:
    attr: int = 1

    class Inner:
        def hidden(self): pass

    def visible(self):
        def helper(): pass
";
    let (text, items) = digest(source);
    assert_eq!(text, "CLS Outer:\n  MTHD visible(self:?):");
    assert_eq!(items, 2);
}

#[test]
fn digest_multiline_default_is_requoted() {
    let (text, _) = digest("def f(sep='''a\nb''', n: int = 2): pass\n");
    assert_eq!(text, r"FUNC f(sep:?='a\nb',n:int=2):");
}
