//! Core filter hooks and their conventional parameters

pub(super) const CORE_HOOKS: &[(&str, &[&str])] = &[
    ("allowed_redirect_hosts", &["$hosts", "$host"]),
    ("authenticate", &["$user", "$username", "$password"]),
    ("block_categories_all", &["$block_categories", "$block_editor_context"]),
    ("body_class", &["$classes", "$css_class"]),
    ("comment_text", &["$comment_text", "$comment", "$args"]),
    ("cron_schedules", &["$schedules"]),
    ("determine_current_user", &["$user_id"]),
    ("document_title_parts", &["$title"]),
    ("excerpt_length", &["$number"]),
    ("excerpt_more", &["$more_string"]),
    ("get_avatar", &["$avatar", "$id_or_email", "$size", "$default_value", "$alt", "$args"]),
    ("get_the_excerpt", &["$post_excerpt", "$post"]),
    ("http_request_args", &["$parsed_args", "$url"]),
    ("image_size_names_choose", &["$size_names"]),
    ("login_redirect", &["$redirect_to", "$requested_redirect_to", "$user"]),
    ("manage_posts_columns", &["$post_columns", "$post_type"]),
    ("mce_buttons", &["$mce_buttons", "$editor_id"]),
    ("nav_menu_css_class", &["$classes", "$menu_item", "$args", "$depth"]),
    ("plugin_action_links", &["$actions", "$plugin_file", "$plugin_data", "$context"]),
    ("post_class", &["$classes", "$css_class", "$post_id"]),
    ("pre_get_document_title", &["$title"]),
    ("query_vars", &["$public_query_vars"]),
    ("rest_authentication_errors", &["$errors"]),
    ("sanitize_file_name", &["$filename", "$filename_raw"]),
    ("script_loader_tag", &["$tag", "$handle", "$src"]),
    ("style_loader_tag", &["$tag", "$handle", "$href", "$media"]),
    ("template_include", &["$template"]),
    ("the_author", &["$display_name"]),
    ("the_content", &["$content"]),
    ("the_excerpt", &["$post_excerpt"]),
    ("the_permalink", &["$permalink", "$post"]),
    ("the_title", &["$post_title", "$post_id"]),
    ("upload_mimes", &["$t", "$user"]),
    ("use_block_editor_for_post", &["$use_block_editor", "$post"]),
    ("widget_text", &["$text", "$instance", "$widget"]),
    ("wp_get_attachment_image_attributes", &["$attr", "$attachment", "$size"]),
    ("wp_handle_upload", &["$upload", "$context"]),
    ("wp_headers", &["$headers", "$wp"]),
    ("wp_insert_post_data", &["$data", "$postarr", "$unsanitized_postarr", "$update"]),
    ("wp_mail", &["$atts"]),
    ("wp_mail_from", &["$from_email"]),
    ("wp_mail_from_name", &["$from_name"]),
    ("wp_nav_menu_items", &["$items", "$args"]),
    ("wp_title", &["$title", "$sep", "$seplocation"]),
];
