//! Prompt construction for the generation routes
//!
//! The style tables and the camera-angle prompt builder live here so the
//! handlers stay thin and the texts can be unit tested. View names in the
//! angle prompt are deliberately explicit (FRONT VIEW, LEFT SIDE VIEW, ...)
//! since the image model follows named views far more reliably than raw
//! degree values.

/// Prompt sent with every fashion motion video request. The clothing and
/// model must match the reference image; audio is muted in post by the
/// provider when asked this way.
pub const FASHION_MOTION_PROMPT: &str = "Generate a video that is going to be featured on a product page of an e-commerce store. This is going to be for a clothing or fashion brand. This video must feature this exact same model that is provided in the reference image and the article of clothing shown.

In this video, the model should strike multiple poses to feature the article of clothing so that a person looking at this product on an ecommerce website has a great idea how this article of clothing will look and feel.

The model should move naturally and gracefully, with soft professional lighting. Keep the focus on the clothing details.

Constraints:
- No music or sound effects.
- The final output video should NOT have any audio.
- Muted audio.
- Muted sound effects.";

/// Scene treatment for each product-enhance style. Unknown styles fall back
/// to the studio look.
pub fn enhance_style_prompt(style: &str) -> &'static str {
    match style {
        "studio" => "E-commerce professional commercial product photography, pure white isolated background, high-end studio lighting, soft sharp focus, 8k resolution, high detail, clean minimalist shot",
        "lifestyle" => "Lifestyle product photography, high-end modern interior, cozy atmosphere, elegant props around, soft focus background, warm natural lighting through a window, professional magazine editorial style",
        "minimalist" => "Ultra-minimalist product photography, solid soft pastel neutral background, architectural shadows, zen aesthetic, clean sharp lines, high-end fashion design aesthetic",
        "luxury" => "Extreme luxury product photography, dramatic noir lighting, dark velvet surface, golden hour reflections, expensive jewelry aesthetic, Vogue campaign style, sharp contrast, deep shadows",
        "bold" => "Creative avant-garde product photography, vibrant neon backlight, holographic surfaces, futuristic vaporwave aesthetic, bold saturated colors, high energy, sharp focus",
        "natural" => "Organic product photography, rustic textured wood surface, surrounded by real botanical elements, dried eucalyptus and moss, earth tones, soft sun dappled lighting, nature-inspired aesthetic",
        _ => enhance_style_prompt("studio"),
    }
}

/// Output aspect ratio for each marketplace preset. Unknown platforms get
/// the 1:1 square used by most storefronts.
pub fn platform_aspect_ratio(platform: &str) -> &'static str {
    match platform {
        "etsy" => "4:3",
        "instagram-story" | "tiktok" => "9:16",
        "pinterest" => "2:3",
        "amazon" | "ebay" | "shopify" | "instagram" | "facebook" | "alibaba" | "walmart"
        | "custom" => "1:1",
        _ => "1:1",
    }
}

/// Style modifier for free-form text-to-image generation. Returns `None`
/// for unknown styles so the caller can pass the prompt through untouched.
pub fn creative_style_prompt(style: &str) -> Option<&'static str> {
    match style {
        "photo" => Some("A photorealistic photograph captured with a professional DSLR camera, natural lighting, sharp focus, 8K resolution, high detail, professional photography, realistic textures, shot with 85mm lens"),
        "digital" => Some("digital art illustration, vibrant saturated colors, clean precise lines, high resolution, modern digital aesthetics, artstation trending"),
        "anime" => Some("anime style artwork, Japanese animation aesthetic, cel-shaded coloring, vibrant colors, highly detailed, studio quality anime, manga inspired"),
        "cinema" => Some("cinematic film still, dramatic lighting, movie scene composition, atmospheric mood, anamorphic lens, professional color grading, 35mm film look, depth of field"),
        "abstract" => Some("abstract art, artistic interpretation, bold colorful shapes, conceptual design, modern art style, geometric patterns"),
        "minimal" => Some("minimalist design, clean simple composition, elegant aesthetics, generous negative space, understated beauty, refined simplicity"),
        "fantasy" => Some("fantasy art illustration, magical ethereal atmosphere, intricate ornate details, mythical elements, dreamlike quality, epic fantasy style"),
        "cyber" => Some("cyberpunk aesthetic, neon lights glow, futuristic urban cityscape, dark atmosphere, high tech low life, blade runner inspired, rain-slicked streets"),
        _ => None,
    }
}

/// Prepend the style modifier to a user prompt. `None` or `"none"` leaves
/// the prompt untouched.
pub fn enhanced_prompt(prompt: &str, style: Option<&str>) -> String {
    match style.and_then(creative_style_prompt) {
        Some(modifier) => format!("{}. {}", modifier, prompt),
        None => prompt.to_string(),
    }
}

/// Build the camera-angle prompt from slider values: rotation -180..180,
/// tilt -90..90, zoom -100..100. Negative rotation turns toward the left
/// side of the product.
pub fn build_angle_prompt(rotation: i32, tilt: i32, zoom: i32) -> String {
    let abs_rotation = rotation.abs();
    let view_description = if abs_rotation == 0 {
        "FRONT VIEW - looking directly at the front of the product"
    } else if abs_rotation <= 30 {
        if rotation < 0 {
            "FRONT-LEFT VIEW - slightly angled to show the left side while still seeing the front"
        } else {
            "FRONT-RIGHT VIEW - slightly angled to show the right side while still seeing the front"
        }
    } else if abs_rotation <= 60 {
        if rotation < 0 {
            "LEFT THREE-QUARTER VIEW - angled view showing mostly the left side with some front visible"
        } else {
            "RIGHT THREE-QUARTER VIEW - angled view showing mostly the right side with some front visible"
        }
    } else if abs_rotation <= 100 {
        if rotation < 0 {
            "LEFT SIDE VIEW - looking directly at the left side of the product"
        } else {
            "RIGHT SIDE VIEW - looking directly at the right side of the product"
        }
    } else if abs_rotation <= 150 {
        if rotation < 0 {
            "BACK-LEFT VIEW - angled view showing mostly the back with some left side visible"
        } else {
            "BACK-RIGHT VIEW - angled view showing mostly the back with some right side visible"
        }
    } else {
        "BACK VIEW - looking directly at the back of the product"
    };

    let abs_tilt = tilt.abs();
    let tilt_description = if abs_tilt > 10 {
        if tilt > 0 {
            if tilt > 45 {
                " Camera is positioned ABOVE looking DOWN (top-down view).".to_string()
            } else {
                format!(" Camera is slightly ABOVE the product ({}° elevation).", tilt)
            }
        } else if tilt < -45 {
            " Camera is positioned BELOW looking UP (worm's eye view).".to_string()
        } else {
            format!(
                " Camera is slightly BELOW the product (low angle shot, {}° below eye level).",
                abs_tilt
            )
        }
    } else {
        String::new()
    };

    let zoom_description = if zoom > 30 {
        " Close-up shot focusing on details."
    } else if zoom < -30 {
        " Wide shot showing the full product."
    } else {
        ""
    };

    format!(
        "You are a product photography AI. Generate a NEW PHOTOGRAPH of this EXACT SAME product from a DIFFERENT CAMERA ANGLE.

REQUIRED CAMERA ANGLE: {view_description}{tilt_description}{zoom_description}

CRITICAL RULES:
1. The product must be EXACTLY the same - same model, same color, same brand, same every detail
2. ONLY the camera position changes - as if a photographer walked to a new position
3. Generate what you would ACTUALLY SEE from the specified angle
4. Maintain professional product photography quality with clean background
5. Keep realistic lighting appropriate for the new angle

EXAMPLE: If this is a cup with a handle on one side, and I ask for LEFT SIDE VIEW, I should see the product from its left side - if the handle is on the left, the handle should be prominently visible facing the camera.

Generate the {view_description} of this product."
    )
}
