use crate::{CleanOptions, Cleaner, Language};
use pyo3::prelude::*;

fn build_options(
    stopwords: Option<Vec<String>>,
    allowed_languages: Option<Vec<String>>,
) -> CleanOptions {
    let mut options = CleanOptions::default();
    if let Some(stopwords) = stopwords {
        options = options.with_stopwords(stopwords);
    }
    if let Some(names) = allowed_languages {
        let languages = names.iter().filter_map(|name| match name.parse::<Language>() {
            Ok(language) => Some(language),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        });
        options = options.with_allowed_languages(languages.collect::<Vec<_>>());
    }
    options
}

fn build_cleaner(options: CleanOptions) -> PyResult<Cleaner> {
    Cleaner::new(options)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
}

#[pyclass(name = "Cleaner", frozen)]
struct PyCleaner {
    inner: Cleaner,
}

#[pymethods]
impl PyCleaner {
    #[new]
    #[pyo3(signature = (stopwords=None, allowed_languages=None))]
    fn new(
        stopwords: Option<Vec<String>>,
        allowed_languages: Option<Vec<String>>,
    ) -> PyResult<Self> {
        let inner = build_cleaner(build_options(stopwords, allowed_languages))?;
        Ok(Self { inner })
    }

    fn clean(&self, py: Python<'_>, text: &str) -> String {
        py.allow_threads(|| self.inner.clean(text))
    }

    fn clean_batch(&self, py: Python<'_>, texts: Vec<String>) -> Vec<String> {
        py.allow_threads(|| self.inner.clean_batch(&texts))
    }

    #[getter]
    fn allowed_languages(&self) -> Vec<&'static str> {
        self.inner
            .allowed_languages()
            .iter()
            .map(Language::name)
            .collect()
    }

    #[getter]
    fn stopwords(&self) -> Vec<String> {
        self.inner.options().stopwords.clone()
    }
}

#[pyfunction]
#[pyo3(signature = (text, stopwords=None, allowed_languages=None))]
fn clean(
    py: Python<'_>,
    text: &str,
    stopwords: Option<Vec<String>>,
    allowed_languages: Option<Vec<String>>,
) -> PyResult<String> {
    let cleaner = build_cleaner(build_options(stopwords, allowed_languages))?;
    Ok(py.allow_threads(|| cleaner.clean(text)))
}

#[pymodule]
fn _unhallu(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCleaner>()?;
    m.add_function(wrap_pyfunction!(clean, m)?)?;

    Ok(())
}
