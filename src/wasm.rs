//! JavaScript bindings for canvas grids.
//!
//! `DropdownCellType` is the registration object a JS grid dispatches to;
//! `DropdownEditorHandle` wraps one edit session. Cells cross the boundary
//! as plain JS objects. Cells handed back to JS are shallow copies of the
//! originals with only `data.value` (and, for deletion, `copyData`)
//! replaced, so host-owned fields and `data.fetchOptions` survive.

use std::rc::Rc;

use js_sys::{Function, Object, Promise, Reflect};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::CanvasRenderingContext2d;

use crate::editor::{
    BrowserScheduler, DropdownEditor, EditOutcome, EditorConfig, EditorProps, FinishedEditing,
};
use crate::error::{DropdownError, Result};
use crate::registry::{CellRenderer, DropdownRenderer};
use crate::render::{
    draw_dropdown, measure_dropdown, CanvasPainter, CellCanvas, CellRect, DrawArgs,
};
use crate::types::{
    scalar_string, CellPayload, CustomCell, DropdownCellData, DropdownOption, FetchFuture,
    OptionFetcher, Theme, DROPDOWN_CELL_KIND,
};

fn js_error(value: JsValue) -> DropdownError {
    DropdownError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

fn decode_or_default<T: DeserializeOwned + Default>(value: JsValue) -> Result<T> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_wasm_bindgen::from_value(value)?)
}

/// Property lookup; anything that throws reads as `undefined`.
fn get(target: &JsValue, key: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn shallow_copy(value: &JsValue) -> Object {
    Object::assign(&Object::new(), value.unchecked_ref())
}

/// Wrap a JS `(query) => Promise<options>` as an option provider.
fn js_fetcher(func: Function) -> OptionFetcher {
    Rc::new(move |query: &str| -> FetchFuture {
        let returned = func.call1(&JsValue::NULL, &JsValue::from_str(query));
        Box::pin(async move {
            let returned = returned.map_err(js_error)?;
            let resolved = JsFuture::from(Promise::resolve(&returned))
                .await
                .map_err(js_error)?;
            let options: Vec<DropdownOption> = serde_wasm_bindgen::from_value(resolved)?;
            Ok::<_, DropdownError>(options)
        })
    })
}

/// Decode a JS cell, lifting `data.fetchOptions` out as a Rust provider.
fn decode_cell(cell: &JsValue) -> Result<CustomCell> {
    let data = get(cell, "data");
    let fetch = get(&data, "fetchOptions").dyn_into::<Function>().ok();

    let plain: JsValue = if fetch.is_some() {
        let data_copy = shallow_copy(&data);
        Reflect::delete_property(&data_copy, &JsValue::from_str("fetchOptions"))
            .map_err(js_error)?;
        let cell_copy = shallow_copy(cell);
        Reflect::set(&cell_copy, &JsValue::from_str("data"), &data_copy).map_err(js_error)?;
        cell_copy.into()
    } else {
        cell.clone()
    };

    let mut decoded: CustomCell = serde_wasm_bindgen::from_value(plain)?;
    if let (Some(func), CellPayload::Dropdown(data)) = (fetch, &mut decoded.data) {
        data.fetch_options = Some(js_fetcher(func));
    }
    Ok(decoded)
}

/// Copy of `original` carrying the fields `next` changed relative to `before`.
fn patch_cell(original: &JsValue, before: &CustomCell, next: &CustomCell) -> Result<JsValue> {
    let value = next
        .as_dropdown()
        .and_then(|d| d.value.as_deref())
        .map_or(JsValue::UNDEFINED, JsValue::from_str);
    let data_copy = shallow_copy(&get(original, "data"));
    Reflect::set(&data_copy, &JsValue::from_str("value"), &value).map_err(js_error)?;

    let cell_copy = shallow_copy(original);
    Reflect::set(&cell_copy, &JsValue::from_str("data"), &data_copy).map_err(js_error)?;
    if next.copy_data != before.copy_data {
        Reflect::set(
            &cell_copy,
            &JsValue::from_str("copyData"),
            &JsValue::from_str(&next.copy_data),
        )
        .map_err(js_error)?;
    }
    Ok(cell_copy.into())
}

fn is_dropdown(cell: &JsValue) -> bool {
    get(&get(cell, "data"), "kind").as_string().as_deref() == Some(DROPDOWN_CELL_KIND)
}

/// Just enough of a cell to paint it: `data.value`, read without decoding
/// the option list or wrapping `fetchOptions`.
fn paint_data(cell: &JsValue) -> DropdownCellData {
    let raw = get(&get(cell, "data"), "value");
    let value = serde_wasm_bindgen::from_value::<serde_json::Value>(raw)
        .ok()
        .as_ref()
        .and_then(scalar_string);
    DropdownCellData {
        value,
        ..DropdownCellData::default()
    }
}

/// Reuse the painter (and its caches) while the host keeps the same context.
fn painter_for(slot: &mut Option<CanvasPainter>, ctx: CanvasRenderingContext2d) -> &mut CanvasPainter {
    let painter = slot
        .take()
        .filter(|p| p.context() == &ctx)
        .unwrap_or_else(|| CanvasPainter::new(ctx));
    slot.insert(painter)
}

/// Registration object for the host grid's custom-cell table.
#[wasm_bindgen]
pub struct DropdownCellType {
    theme: Theme,
    font: String,
    painter: Option<CanvasPainter>,
}

#[wasm_bindgen]
impl DropdownCellType {
    /// Create the cell type. `theme` may be partial or undefined.
    #[wasm_bindgen(constructor)]
    pub fn new(theme: JsValue) -> std::result::Result<DropdownCellType, JsValue> {
        console_error_panic_hook::set_once();
        let theme: Theme = decode_or_default(theme)?;
        Ok(DropdownCellType {
            font: theme.base_font_full(),
            theme,
            painter: None,
        })
    }

    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&mut self, theme: JsValue) -> std::result::Result<(), JsValue> {
        self.theme = decode_or_default(theme)?;
        self.font = self.theme.base_font_full();
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> String {
        DROPDOWN_CELL_KIND.to_string()
    }

    /// Tag check without decoding the payload.
    #[wasm_bindgen(js_name = isMatch)]
    pub fn is_match(&self, cell: JsValue) -> bool {
        is_dropdown(&cell)
    }

    /// Paint a cell. Expects the host to have set `textBaseline = "middle"`.
    /// Returns `false` only for cells of another kind.
    pub fn draw(
        &mut self,
        ctx: CanvasRenderingContext2d,
        cell: JsValue,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> bool {
        if !is_dropdown(&cell) {
            return false;
        }
        let data = paint_data(&cell);
        let painter = painter_for(&mut self.painter, ctx);
        painter.set_font(&self.font);
        let mut args = DrawArgs {
            ctx: painter,
            rect: CellRect::new(x, y, width, height),
            theme: &self.theme,
        };
        draw_dropdown(&mut args, &data)
    }

    pub fn measure(&mut self, ctx: CanvasRenderingContext2d, cell: JsValue) -> f64 {
        if !is_dropdown(&cell) {
            return 0.0;
        }
        let data = paint_data(&cell);
        let painter = painter_for(&mut self.painter, ctx);
        painter.set_font(&self.font);
        measure_dropdown(painter, &data, &self.theme)
    }

    /// Forget cached text metrics (call after web fonts load).
    #[wasm_bindgen(js_name = clearMetrics)]
    pub fn clear_metrics(&mut self) {
        if let Some(painter) = self.painter.as_mut() {
            painter.clear_caches();
        }
    }

    #[wasm_bindgen(js_name = onPaste)]
    pub fn on_paste(&self, value: String, cell: JsValue) -> std::result::Result<JsValue, JsValue> {
        let before = decode_cell(&cell)?;
        let next = DropdownRenderer
            .on_paste(&value, &before)
            .ok_or_else(|| DropdownError::UnsupportedCell(before.kind().to_string()))?;
        Ok(patch_cell(&cell, &before, &next)?)
    }

    #[wasm_bindgen(js_name = deletedValue)]
    pub fn deleted_value(&self, cell: JsValue) -> std::result::Result<JsValue, JsValue> {
        let before = decode_cell(&cell)?;
        let next = DropdownRenderer
            .on_delete(&before)
            .ok_or_else(|| DropdownError::UnsupportedCell(before.kind().to_string()))?;
        Ok(patch_cell(&cell, &before, &next)?)
    }
}

/// One edit session, driven by the host's editor overlay.
#[wasm_bindgen]
pub struct DropdownEditorHandle {
    editor: Option<DropdownEditor>,
    /// How the session ended, once `teardown` has run.
    finished: Option<EditOutcome>,
    cell: JsValue,
    before: CustomCell,
}

#[wasm_bindgen]
impl DropdownEditorHandle {
    /// Activate an editor for `cell`.
    ///
    /// `onFinishedEditing` receives the committed cell (a patched copy of
    /// `cell`). `theme` and `config` may be undefined.
    #[wasm_bindgen(constructor)]
    pub fn new(
        cell: JsValue,
        on_finished_editing: Function,
        initial_input: Option<String>,
        theme: JsValue,
        config: JsValue,
    ) -> std::result::Result<DropdownEditorHandle, JsValue> {
        console_error_panic_hook::set_once();
        let decoded = decode_cell(&cell)?;
        let theme: Theme = decode_or_default(theme)?;
        let config: EditorConfig = decode_or_default(config)?;

        let original = cell.clone();
        let before = decoded.clone();
        let on_finished: FinishedEditing = Rc::new(move |next: Option<CustomCell>| {
            let arg = match next {
                Some(next) => patch_cell(&original, &before, &next).unwrap_or(JsValue::UNDEFINED),
                None => JsValue::UNDEFINED,
            };
            if let Err(e) = on_finished_editing.call1(&JsValue::NULL, &arg) {
                warn!(error = %js_error(e), "onFinishedEditing threw");
            }
        });

        let editor = DropdownEditor::new(EditorProps {
            cell: decoded.clone(),
            on_finished_editing: on_finished,
            initial_input,
            scheduler: Rc::new(BrowserScheduler::new()),
            theme,
            config,
        })?;

        Ok(DropdownEditorHandle {
            editor: Some(editor),
            finished: None,
            cell,
            before: decoded,
        })
    }

    /// Current view model, or `undefined` after teardown.
    pub fn view(&self) -> std::result::Result<JsValue, JsValue> {
        match &self.editor {
            Some(editor) => Ok(to_js(&editor.view())?),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn styles(&self) -> std::result::Result<JsValue, JsValue> {
        match &self.editor {
            Some(editor) => Ok(to_js(editor.styles())?),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn focus(&self) {
        if let Some(editor) = &self.editor {
            editor.focus();
        }
    }

    pub fn blur(&self) {
        if let Some(editor) = &self.editor {
            editor.blur();
        }
    }

    #[wasm_bindgen(js_name = inputChange)]
    pub fn input_change(&self, text: String) {
        if let Some(editor) = &self.editor {
            editor.input_change(&text);
        }
    }

    /// Selection from the widget; `null`/`undefined` means nothing chosen.
    pub fn select(&self, option: JsValue) -> std::result::Result<(), JsValue> {
        let Some(editor) = &self.editor else {
            return Ok(());
        };
        let option: DropdownOption = decode_or_default(option)?;
        match option {
            DropdownOption::None => editor.select(None),
            other => editor.select(Some(&other.normalize())),
        }
        Ok(())
    }

    /// Called after asynchronously loaded options change the view.
    #[wasm_bindgen(js_name = setRenderCallback)]
    pub fn set_render_callback(&self, callback: Function) {
        if let Some(editor) = &self.editor {
            editor.set_on_change(Rc::new(move || {
                if let Err(e) = callback.call0(&JsValue::NULL) {
                    warn!(error = %js_error(e), "render callback threw");
                }
            }));
        }
    }

    /// `{outcome: "stillEditing" | "committed" | "cancelled", cell?}`.
    pub fn outcome(&self) -> std::result::Result<JsValue, JsValue> {
        let outcome = match (&self.editor, &self.finished) {
            (Some(editor), _) => editor.outcome(),
            (None, Some(finished)) => finished.clone(),
            (None, None) => EditOutcome::Cancelled,
        };
        Ok(self.outcome_to_js(&outcome)?)
    }

    /// End the session and report how it ended. Repeat calls report the
    /// same outcome.
    pub fn teardown(&mut self) -> std::result::Result<JsValue, JsValue> {
        if let Some(editor) = self.editor.take() {
            self.finished = Some(editor.teardown());
        }
        let outcome = self.finished.clone().unwrap_or(EditOutcome::Cancelled);
        Ok(self.outcome_to_js(&outcome)?)
    }
}

impl DropdownEditorHandle {
    fn outcome_to_js(&self, outcome: &EditOutcome) -> Result<JsValue> {
        let result = Object::new();
        let (tag, cell) = match outcome {
            EditOutcome::Committed(next) => {
                ("committed", patch_cell(&self.cell, &self.before, next)?)
            }
            EditOutcome::Cancelled => ("cancelled", JsValue::UNDEFINED),
            EditOutcome::StillEditing => ("stillEditing", JsValue::UNDEFINED),
        };
        Reflect::set(&result, &JsValue::from_str("outcome"), &JsValue::from_str(tag))
            .map_err(js_error)?;
        Reflect::set(&result, &JsValue::from_str("cell"), &cell).map_err(js_error)?;
        Ok(result.into())
    }
}
