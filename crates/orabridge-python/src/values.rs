//! Small conversions of Python values used across the bindings.

use pyo3::prelude::*;
use pyo3::types::{PyString, PyTuple, PyType};

/// Truthiness of an optional value, with a default for absent values.
///
/// Errors raised by the value's `__bool__` or `__len__` propagate
/// unchanged.
pub fn coerce_boolean(value: Option<&Bound<'_, PyAny>>, default: bool) -> PyResult<bool> {
    match value {
        None => Ok(default),
        Some(value) => value.is_truthy(),
    }
}

/// Declaring module and simple name of a type, fetched in that order.
pub fn type_identity<'py>(
    ty: &Bound<'py, PyType>,
) -> PyResult<(Bound<'py, PyAny>, Bound<'py, PyAny>)> {
    let module = ty.getattr("__module__")?;
    let name = ty.getattr("__name__")?;
    Ok((module, name))
}

/// Apply `%`-formatting to `format`, consuming the argument tuple.
pub fn format_string<'py>(
    py: Python<'py>,
    format: &str,
    args: Bound<'py, PyTuple>,
) -> PyResult<Bound<'py, PyString>> {
    let format = PyString::new(py, format);
    format.call_method1("__mod__", (args,))?.str()
}

/// `module.name` of an object's type, for error messages
pub fn qualified_type_name(value: &Bound<'_, PyAny>) -> PyResult<String> {
    let py = value.py();
    let (module, name) = type_identity(&value.get_type())?;
    let args = PyTuple::new(py, [module, name])?;
    Ok(format_string(py, "%s.%s", args)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyo3::exceptions::{PyAttributeError, PyKeyError, PyZeroDivisionError};
    use pyo3::types::{PyDict, PyList};
    use std::ffi::CString;

    fn eval<'py>(py: Python<'py>, code: &str) -> Bound<'py, PyAny> {
        let code = CString::new(code).unwrap();
        py.eval(&code, None, None).unwrap()
    }

    fn run<'py>(py: Python<'py>, code: &str) -> Bound<'py, PyDict> {
        let locals = PyDict::new(py);
        let code = CString::new(code).unwrap();
        py.run(&code, Some(&locals), None).unwrap();
        locals
    }

    #[test]
    fn test_coerce_boolean_truth_table() {
        Python::initialize();
        Python::attach(|py| {
            assert!(coerce_boolean(None, true).unwrap());
            assert!(!coerce_boolean(None, false).unwrap());

            for truthy in ["1", "'x'", "[0]", "{'a': 1}", "True"] {
                let value = eval(py, truthy);
                assert!(coerce_boolean(Some(&value), false).unwrap(), "{truthy}");
            }
            for falsy in ["0", "''", "[]", "{}", "False", "None"] {
                let value = eval(py, falsy);
                assert!(!coerce_boolean(Some(&value), true).unwrap(), "{falsy}");
            }
        });
    }

    #[test]
    fn test_coerce_boolean_propagates_failure() {
        Python::initialize();
        Python::attach(|py| {
            let locals = run(
                py,
                "class Broken:\n    def __bool__(self):\n        return 1 // 0\nvalue = Broken()\n",
            );
            let value = locals.get_item("value").unwrap().unwrap();
            let err = coerce_boolean(Some(&value), true).unwrap_err();
            assert!(err.is_instance_of::<PyZeroDivisionError>(py));
        });
    }

    #[test]
    fn test_type_identity_of_builtin() {
        Python::initialize();
        Python::attach(|py| {
            let list_type = PyList::empty(py).get_type();
            let (module, name) = type_identity(&list_type).unwrap();
            assert_eq!(module.extract::<String>().unwrap(), "builtins");
            assert_eq!(name.extract::<String>().unwrap(), "list");
        });
    }

    #[test]
    fn test_type_identity_failure() {
        Python::initialize();
        Python::attach(|py| {
            let locals = run(
                py,
                "class Meta(type):\n    def __getattribute__(cls, attr):\n        if attr == '__name__':\n            raise AttributeError('no name')\n        return super().__getattribute__(attr)\nclass Odd(metaclass=Meta):\n    pass\n",
            );
            let odd = locals.get_item("Odd").unwrap().unwrap();
            let odd = odd.cast::<PyType>().unwrap();
            let err = type_identity(odd).unwrap_err();
            assert!(err.is_instance_of::<PyAttributeError>(py));
        });
    }

    #[test]
    fn test_type_identity_module_failure() {
        Python::initialize();
        Python::attach(|py| {
            let locals = run(
                py,
                "class Meta(type):\n    def __getattribute__(cls, attr):\n        if attr == '__module__':\n            raise KeyError('no module')\n        return super().__getattribute__(attr)\nclass Odd(metaclass=Meta):\n    pass\n",
            );
            let odd = locals.get_item("Odd").unwrap().unwrap();
            let odd = odd.cast::<PyType>().unwrap();
            let err = type_identity(odd).unwrap_err();
            assert!(err.is_instance_of::<PyKeyError>(py));
        });
    }

    #[test]
    fn test_format_string() {
        Python::initialize();
        Python::attach(|py| {
            let args = PyTuple::new(py, ["a", "b"]).unwrap();
            let formatted = format_string(py, "%s and %s", args).unwrap();
            assert_eq!(formatted.to_string(), "a and b");
        });
    }

    #[test]
    fn test_qualified_type_name() {
        Python::initialize();
        Python::attach(|py| {
            let value = eval(py, "3");
            assert_eq!(qualified_type_name(&value).unwrap(), "builtins.int");
        });
    }
}
