use std::panic::Location;

/// Call site a log line is attributed to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Caller<'a> {
    pub file: &'a str,
    pub function: &'a str,
    pub line: u32,
}

impl<'a> Caller<'a> {
    pub fn new(file: &'a str, function: &'a str, line: u32) -> Caller<'a> {
        Caller {
            file,
            function,
            line,
        }
    }

    /// File and line of the nearest caller not marked `#[track_caller]`.
    /// The function name is not available this way and stays blank.
    #[track_caller]
    pub fn resolve() -> Caller<'static> {
        let location = Location::caller();
        Caller::new(location.file(), "", location.line())
    }

    pub fn file_base_name(&self) -> &'a str {
        file_base_name(self.file)
    }

    pub fn short_function_name(&self) -> &'a str {
        short_function_name(self.function)
    }
}

pub fn file_base_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("")
}

/// `app::handlers::login::{{closure}}` -> `login`
pub fn short_function_name(path: &str) -> &str {
    let mut path = path;
    while let Some(stripped) = path.strip_suffix("::{{closure}}") {
        path = stripped;
    }
    path.rsplit("::").next().unwrap_or("")
}

/// Full path of the enclosing function, including a trailing `::__f`.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn __f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(__f);
        name.strip_suffix("::__f").unwrap_or(name)
    }};
}

/// Resolves the current call site, function name included.
#[macro_export]
macro_rules! caller {
    () => {
        $crate::Caller::new(file!(), $crate::__function_path!(), line!())
    };
}
