#![allow(non_snake_case)]

// --- COM VTable Definitions ---
// Slot order is the ABI: it must match the interface declaration exactly,
// including methods this crate never calls.

use std::ffi::c_void;

use crate::co::{HRESULT, SFGAO, SHCONTF, SIGDN, TBPFLAG};
use crate::guid::GUID;
use crate::types::*;

type This = *mut c_void;
type Out = *mut *mut c_void;

#[repr(C)]
pub struct IUnknownVtbl {
    pub query_interface: unsafe extern "system" fn(This, *const GUID, Out) -> HRESULT,
    pub add_ref: unsafe extern "system" fn(This) -> u32,
    pub release: unsafe extern "system" fn(This) -> u32,
}

#[repr(C)]
pub struct IDropTargetVtbl {
    pub base: IUnknownVtbl,
    pub drag_enter: unsafe extern "system" fn(This, *mut c_void, u32, POINTL, *mut u32) -> HRESULT,
    pub drag_over: unsafe extern "system" fn(This, u32, POINTL, *mut u32) -> HRESULT,
    pub drag_leave: unsafe extern "system" fn(This) -> HRESULT,
    pub drop: unsafe extern "system" fn(This, *mut c_void, u32, POINTL, *mut u32) -> HRESULT,
}

#[repr(C)]
pub struct IFileOperationProgressSinkVtbl {
    pub base: IUnknownVtbl,
    pub start_operations: unsafe extern "system" fn(This) -> HRESULT,
    pub finish_operations: unsafe extern "system" fn(This, HRESULT) -> HRESULT,
    pub pre_rename_item: unsafe extern "system" fn(This, u32, *mut c_void, PCWSTR) -> HRESULT,
    pub post_rename_item: unsafe extern "system" fn(This, u32, *mut c_void, PCWSTR, HRESULT, *mut c_void) -> HRESULT,
    pub pre_move_item: unsafe extern "system" fn(This, u32, *mut c_void, *mut c_void, PCWSTR) -> HRESULT,
    pub post_move_item: unsafe extern "system" fn(This, u32, *mut c_void, *mut c_void, PCWSTR, HRESULT, *mut c_void) -> HRESULT,
    pub pre_copy_item: unsafe extern "system" fn(This, u32, *mut c_void, *mut c_void, PCWSTR) -> HRESULT,
    pub post_copy_item: unsafe extern "system" fn(This, u32, *mut c_void, *mut c_void, PCWSTR, HRESULT, *mut c_void) -> HRESULT,
    pub pre_delete_item: unsafe extern "system" fn(This, u32, *mut c_void) -> HRESULT,
    pub post_delete_item: unsafe extern "system" fn(This, u32, *mut c_void, HRESULT, *mut c_void) -> HRESULT,
    pub pre_new_item: unsafe extern "system" fn(This, u32, *mut c_void, PCWSTR) -> HRESULT,
    pub post_new_item: unsafe extern "system" fn(This, u32, *mut c_void, PCWSTR, PCWSTR, u32, HRESULT, *mut c_void) -> HRESULT,
    pub update_progress: unsafe extern "system" fn(This, u32, u32) -> HRESULT,
    pub reset_timer: unsafe extern "system" fn(This) -> HRESULT,
    pub pause_timer: unsafe extern "system" fn(This) -> HRESULT,
    pub resume_timer: unsafe extern "system" fn(This) -> HRESULT,
}

#[repr(C)]
pub struct IShellItemFilterVtbl {
    pub base: IUnknownVtbl,
    pub include_item: unsafe extern "system" fn(This, *mut c_void) -> HRESULT,
    pub get_enum_flags_for_item: unsafe extern "system" fn(This, *mut c_void, *mut SHCONTF) -> HRESULT,
}

#[repr(C)]
pub struct IShellItemVtbl {
    pub base: IUnknownVtbl,
    pub bind_to_handler: unsafe extern "system" fn(This, *mut c_void, *const GUID, *const GUID, Out) -> HRESULT,
    pub get_parent: unsafe extern "system" fn(This, Out) -> HRESULT,
    pub get_display_name: unsafe extern "system" fn(This, SIGDN, *mut PWSTR) -> HRESULT,
    pub get_attributes: unsafe extern "system" fn(This, SFGAO, *mut SFGAO) -> HRESULT,
    pub compare: unsafe extern "system" fn(This, *mut c_void, u32, *mut i32) -> HRESULT,
}

#[repr(C)]
pub struct IShellItemArrayVtbl {
    pub base: IUnknownVtbl,
    pub bind_to_handler: unsafe extern "system" fn(This, *mut c_void, *const GUID, *const GUID, Out) -> HRESULT,
    pub get_property_store: unsafe extern "system" fn(This, u32, *const GUID, Out) -> HRESULT,
    pub get_property_description_list: unsafe extern "system" fn(This, *const c_void, *const GUID, Out) -> HRESULT,
    pub get_attributes: unsafe extern "system" fn(This, u32, SFGAO, *mut SFGAO) -> HRESULT,
    pub get_count: unsafe extern "system" fn(This, *mut u32) -> HRESULT,
    pub get_item_at: unsafe extern "system" fn(This, u32, Out) -> HRESULT,
    pub enum_items: unsafe extern "system" fn(This, Out) -> HRESULT,
}

#[repr(C)]
pub struct IEnumShellItemsVtbl {
    pub base: IUnknownVtbl,
    pub next: unsafe extern "system" fn(This, u32, Out, *mut u32) -> HRESULT,
    pub skip: unsafe extern "system" fn(This, u32) -> HRESULT,
    pub reset: unsafe extern "system" fn(This) -> HRESULT,
    pub clone: unsafe extern "system" fn(This, Out) -> HRESULT,
}

#[repr(C)]
pub struct IDataObjectVtbl {
    pub base: IUnknownVtbl,
    pub get_data: unsafe extern "system" fn(This, *const FORMATETC, *mut STGMEDIUM) -> HRESULT,
    pub get_data_here: unsafe extern "system" fn(This, *const FORMATETC, *mut STGMEDIUM) -> HRESULT,
    pub query_get_data: unsafe extern "system" fn(This, *const FORMATETC) -> HRESULT,
    pub get_canonical_format_etc: unsafe extern "system" fn(This, *const FORMATETC, *mut FORMATETC) -> HRESULT,
    pub set_data: unsafe extern "system" fn(This, *const FORMATETC, *const STGMEDIUM, BOOL) -> HRESULT,
    pub enum_format_etc: unsafe extern "system" fn(This, u32, Out) -> HRESULT,
    pub d_advise: unsafe extern "system" fn(This, *const FORMATETC, u32, *mut c_void, *mut u32) -> HRESULT,
    pub d_unadvise: unsafe extern "system" fn(This, u32) -> HRESULT,
    pub enum_d_advise: unsafe extern "system" fn(This, Out) -> HRESULT,
}

#[repr(C)]
pub struct ISequentialStreamVtbl {
    pub base: IUnknownVtbl,
    pub read: unsafe extern "system" fn(This, *mut c_void, u32, *mut u32) -> HRESULT,
    pub write: unsafe extern "system" fn(This, *const c_void, u32, *mut u32) -> HRESULT,
}

#[repr(C)]
pub struct IStreamVtbl {
    pub base: ISequentialStreamVtbl,
    pub seek: unsafe extern "system" fn(This, i64, u32, *mut u64) -> HRESULT,
    pub set_size: unsafe extern "system" fn(This, u64) -> HRESULT,
    pub copy_to: unsafe extern "system" fn(This, *mut c_void, u64, *mut u64, *mut u64) -> HRESULT,
    pub commit: unsafe extern "system" fn(This, u32) -> HRESULT,
    pub revert: unsafe extern "system" fn(This) -> HRESULT,
    pub lock_region: unsafe extern "system" fn(This, u64, u64, u32) -> HRESULT,
    pub unlock_region: unsafe extern "system" fn(This, u64, u64, u32) -> HRESULT,
    pub stat: unsafe extern "system" fn(This, *mut STATSTG, u32) -> HRESULT,
    pub clone: unsafe extern "system" fn(This, Out) -> HRESULT,
}

#[repr(C)]
pub struct IModalWindowVtbl {
    pub base: IUnknownVtbl,
    pub show: unsafe extern "system" fn(This, HWND) -> HRESULT,
}

#[repr(C)]
pub struct IFileDialogVtbl {
    pub base: IModalWindowVtbl,
    pub set_file_types: unsafe extern "system" fn(This, u32, *const COMDLG_FILTERSPEC) -> HRESULT,
    pub set_file_type_index: unsafe extern "system" fn(This, u32) -> HRESULT,
    pub get_file_type_index: unsafe extern "system" fn(This, *mut u32) -> HRESULT,
    pub advise: unsafe extern "system" fn(This, *mut c_void, *mut u32) -> HRESULT,
    pub unadvise: unsafe extern "system" fn(This, u32) -> HRESULT,
    pub set_options: unsafe extern "system" fn(This, u32) -> HRESULT,
    pub get_options: unsafe extern "system" fn(This, *mut u32) -> HRESULT,
    pub set_default_folder: unsafe extern "system" fn(This, *mut c_void) -> HRESULT,
    pub set_folder: unsafe extern "system" fn(This, *mut c_void) -> HRESULT,
    pub get_folder: unsafe extern "system" fn(This, Out) -> HRESULT,
    pub get_current_selection: unsafe extern "system" fn(This, Out) -> HRESULT,
    pub set_file_name: unsafe extern "system" fn(This, PCWSTR) -> HRESULT,
    pub get_file_name: unsafe extern "system" fn(This, *mut PWSTR) -> HRESULT,
    pub set_title: unsafe extern "system" fn(This, PCWSTR) -> HRESULT,
    pub set_ok_button_label: unsafe extern "system" fn(This, PCWSTR) -> HRESULT,
    pub set_file_name_label: unsafe extern "system" fn(This, PCWSTR) -> HRESULT,
    pub get_result: unsafe extern "system" fn(This, Out) -> HRESULT,
    pub add_place: unsafe extern "system" fn(This, *mut c_void, u32) -> HRESULT,
    pub set_default_extension: unsafe extern "system" fn(This, PCWSTR) -> HRESULT,
    pub close: unsafe extern "system" fn(This, HRESULT) -> HRESULT,
    pub set_client_guid: unsafe extern "system" fn(This, *const GUID) -> HRESULT,
    pub clear_client_data: unsafe extern "system" fn(This) -> HRESULT,
    pub set_filter: unsafe extern "system" fn(This, *mut c_void) -> HRESULT,
}

#[repr(C)]
pub struct IFileOpenDialogVtbl {
    pub base: IFileDialogVtbl,
    pub get_results: unsafe extern "system" fn(This, Out) -> HRESULT,
    pub get_selected_items: unsafe extern "system" fn(This, Out) -> HRESULT,
}

#[repr(C)]
pub struct IFileOperationVtbl {
    pub base: IUnknownVtbl,
    pub advise: unsafe extern "system" fn(This, *mut c_void, *mut u32) -> HRESULT,
    pub unadvise: unsafe extern "system" fn(This, u32) -> HRESULT,
    pub set_operation_flags: unsafe extern "system" fn(This, u32) -> HRESULT,
    pub set_progress_message: unsafe extern "system" fn(This, PCWSTR) -> HRESULT,
    pub set_progress_dialog: unsafe extern "system" fn(This, *mut c_void) -> HRESULT,
    pub set_properties: unsafe extern "system" fn(This, *mut c_void) -> HRESULT,
    pub set_owner_window: unsafe extern "system" fn(This, HWND) -> HRESULT,
    pub apply_properties_to_item: unsafe extern "system" fn(This, *mut c_void) -> HRESULT,
    pub apply_properties_to_items: unsafe extern "system" fn(This, *mut c_void) -> HRESULT,
    pub rename_item: unsafe extern "system" fn(This, *mut c_void, PCWSTR, *mut c_void) -> HRESULT,
    pub rename_items: unsafe extern "system" fn(This, *mut c_void, PCWSTR) -> HRESULT,
    pub move_item: unsafe extern "system" fn(This, *mut c_void, *mut c_void, PCWSTR, *mut c_void) -> HRESULT,
    pub move_items: unsafe extern "system" fn(This, *mut c_void, *mut c_void) -> HRESULT,
    pub copy_item: unsafe extern "system" fn(This, *mut c_void, *mut c_void, PCWSTR, *mut c_void) -> HRESULT,
    pub copy_items: unsafe extern "system" fn(This, *mut c_void, *mut c_void) -> HRESULT,
    pub delete_item: unsafe extern "system" fn(This, *mut c_void, *mut c_void) -> HRESULT,
    pub delete_items: unsafe extern "system" fn(This, *mut c_void) -> HRESULT,
    pub new_item: unsafe extern "system" fn(This, *mut c_void, u32, PCWSTR, PCWSTR, *mut c_void) -> HRESULT,
    pub perform_operations: unsafe extern "system" fn(This) -> HRESULT,
    pub get_any_operations_aborted: unsafe extern "system" fn(This, *mut BOOL) -> HRESULT,
}

#[repr(C)]
pub struct ITaskbarListVtbl {
    pub base: IUnknownVtbl,
    pub hr_init: unsafe extern "system" fn(This) -> HRESULT,
    pub add_tab: unsafe extern "system" fn(This, HWND) -> HRESULT,
    pub delete_tab: unsafe extern "system" fn(This, HWND) -> HRESULT,
    pub activate_tab: unsafe extern "system" fn(This, HWND) -> HRESULT,
    pub set_active_alt: unsafe extern "system" fn(This, HWND) -> HRESULT,
}

#[repr(C)]
pub struct ITaskbarList2Vtbl {
    pub base: ITaskbarListVtbl,
    pub mark_fullscreen_window: unsafe extern "system" fn(This, HWND, BOOL) -> HRESULT,
}

#[repr(C)]
pub struct ITaskbarList3Vtbl {
    pub base: ITaskbarList2Vtbl,
    pub set_progress_value: unsafe extern "system" fn(This, HWND, u64, u64) -> HRESULT,
    pub set_progress_state: unsafe extern "system" fn(This, HWND, TBPFLAG) -> HRESULT,
    pub register_tab: unsafe extern "system" fn(This, HWND, HWND) -> HRESULT,
    pub unregister_tab: unsafe extern "system" fn(This, HWND) -> HRESULT,
    pub set_tab_order: unsafe extern "system" fn(This, HWND, HWND) -> HRESULT,
    pub set_tab_active: unsafe extern "system" fn(This, HWND, HWND, u32) -> HRESULT,
    pub thumb_bar_add_buttons: unsafe extern "system" fn(This, HWND, u32, *const c_void) -> HRESULT,
    pub thumb_bar_update_buttons: unsafe extern "system" fn(This, HWND, u32, *const c_void) -> HRESULT,
    pub thumb_bar_set_image_list: unsafe extern "system" fn(This, HWND, HIMAGELIST) -> HRESULT,
    pub set_overlay_icon: unsafe extern "system" fn(This, HWND, HICON, PCWSTR) -> HRESULT,
    pub set_thumbnail_tooltip: unsafe extern "system" fn(This, HWND, PCWSTR) -> HRESULT,
    pub set_thumbnail_clip: unsafe extern "system" fn(This, HWND, *const RECT) -> HRESULT,
}

#[repr(C)]
pub struct IShellLinkWVtbl {
    pub base: IUnknownVtbl,
    pub get_path: unsafe extern "system" fn(This, PWSTR, i32, *mut WIN32_FIND_DATAW, u32) -> HRESULT,
    pub get_id_list: unsafe extern "system" fn(This, *mut *mut c_void) -> HRESULT,
    pub set_id_list: unsafe extern "system" fn(This, *const c_void) -> HRESULT,
    pub get_description: unsafe extern "system" fn(This, PWSTR, i32) -> HRESULT,
    pub set_description: unsafe extern "system" fn(This, PCWSTR) -> HRESULT,
    pub get_working_directory: unsafe extern "system" fn(This, PWSTR, i32) -> HRESULT,
    pub set_working_directory: unsafe extern "system" fn(This, PCWSTR) -> HRESULT,
    pub get_arguments: unsafe extern "system" fn(This, PWSTR, i32) -> HRESULT,
    pub set_arguments: unsafe extern "system" fn(This, PCWSTR) -> HRESULT,
    pub get_hotkey: unsafe extern "system" fn(This, *mut u16) -> HRESULT,
    pub set_hotkey: unsafe extern "system" fn(This, u16) -> HRESULT,
    pub get_show_cmd: unsafe extern "system" fn(This, *mut i32) -> HRESULT,
    pub set_show_cmd: unsafe extern "system" fn(This, i32) -> HRESULT,
    pub get_icon_location: unsafe extern "system" fn(This, PWSTR, i32, *mut i32) -> HRESULT,
    pub set_icon_location: unsafe extern "system" fn(This, PCWSTR, i32) -> HRESULT,
    pub set_relative_path: unsafe extern "system" fn(This, PCWSTR, u32) -> HRESULT,
    pub resolve: unsafe extern "system" fn(This, HWND, u32) -> HRESULT,
    pub set_path: unsafe extern "system" fn(This, PCWSTR) -> HRESULT,
}

#[repr(C)]
pub struct IPersistVtbl {
    pub base: IUnknownVtbl,
    pub get_class_id: unsafe extern "system" fn(This, *mut GUID) -> HRESULT,
}

#[repr(C)]
pub struct IPersistFileVtbl {
    pub base: IPersistVtbl,
    pub is_dirty: unsafe extern "system" fn(This) -> HRESULT,
    pub load: unsafe extern "system" fn(This, PCWSTR, u32) -> HRESULT,
    pub save: unsafe extern "system" fn(This, PCWSTR, BOOL) -> HRESULT,
    pub save_completed: unsafe extern "system" fn(This, PCWSTR) -> HRESULT,
    pub get_cur_file: unsafe extern "system" fn(This, *mut PWSTR) -> HRESULT,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    const P: usize = size_of::<usize>();

    #[test]
    fn test_slot_counts() {
        assert_eq!(size_of::<IUnknownVtbl>(), 3 * P);
        assert_eq!(size_of::<IDropTargetVtbl>(), 7 * P);
        assert_eq!(size_of::<IFileOperationProgressSinkVtbl>(), 19 * P);
        assert_eq!(size_of::<IShellItemVtbl>(), 8 * P);
        assert_eq!(size_of::<IShellItemArrayVtbl>(), 10 * P);
        assert_eq!(size_of::<IDataObjectVtbl>(), 12 * P);
        assert_eq!(size_of::<IStreamVtbl>(), 14 * P);
        assert_eq!(size_of::<IFileOpenDialogVtbl>(), 29 * P);
        assert_eq!(size_of::<IFileOperationVtbl>(), 23 * P);
        assert_eq!(size_of::<ITaskbarList3Vtbl>(), 21 * P);
        assert_eq!(size_of::<IShellLinkWVtbl>(), 21 * P);
        assert_eq!(size_of::<IPersistFileVtbl>(), 9 * P);
    }
}
