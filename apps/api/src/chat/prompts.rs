// Localized prompt fragments for the farmer chat assistant.
// Each language has one `PromptText`; prompt_builder picks the set and fills it in.

use crate::chat::models::Language;

/// Returned when the model produced no usable text. Deliberately bilingual so
/// it reads correctly whatever language the farmer selected.
pub const FALLBACK_ANSWER: &str = "क्षमा करें, मैं अभी इस प्रश्न का उत्तर नहीं दे पा रहा हूँ। कृपया थोड़ी देर बाद फिर पूछें। \
    / Sorry, I cannot answer this right now. Please ask again in a little while.";

pub struct PromptText {
    pub persona: &'static str,
    pub profile_heading: &'static str,
    pub name_label: &'static str,
    pub region_label: &'static str,
    pub crops_label: &'static str,
    pub soil_label: &'static str,
    pub irrigation_label: &'static str,
    pub unknown: &'static str,
    pub prediction_heading: &'static str,
    pub prediction_type_label: &'static str,
    pub prediction_result_label: &'static str,
    pub prediction_confidence_label: &'static str,
    pub prediction_crop_label: &'static str,
    pub prediction_date_label: &'static str,
    pub no_prediction: &'static str,
    pub language_instruction: &'static str,
    pub question_heading: &'static str,
    pub format_heading: &'static str,
    pub format_steps: [&'static str; 4],
}

pub static ENGLISH: PromptText = PromptText {
    persona: "You are Krishi Mitra, an experienced agricultural advisor who helps Indian farmers \
        with practical, location-aware guidance. Base your advice on the farmer's profile and \
        their latest prediction when one is available.",
    profile_heading: "FARMER PROFILE:",
    name_label: "Name",
    region_label: "Region",
    crops_label: "Crops",
    soil_label: "Soil type",
    irrigation_label: "Irrigation method",
    unknown: "N/A",
    prediction_heading: "LATEST PREDICTION:",
    prediction_type_label: "Type",
    prediction_result_label: "Result",
    prediction_confidence_label: "Confidence",
    prediction_crop_label: "Crop",
    prediction_date_label: "Date",
    no_prediction: "No recent prediction is available for this farmer.",
    language_instruction: "LANGUAGE: Answer only in simple English that a farmer can easily \
        understand. Avoid technical jargon; when a technical term is needed, explain it briefly.",
    question_heading: "FARMER'S QUESTION:",
    format_heading: "ANSWER FORMAT:",
    format_steps: [
        "1. Main answer: a direct answer to the question in 2-3 sentences.",
        "2. Action steps: 3-5 concrete steps the farmer can take now.",
        "3. Precautions: what to avoid or watch out for.",
        "4. Follow-up question: one short question that helps the farmer go further.",
    ],
};

pub static HINDI: PromptText = PromptText {
    persona: "आप कृषि मित्र हैं, एक अनुभवी कृषि सलाहकार जो भारतीय किसानों को व्यावहारिक और \
        स्थान के अनुसार मार्गदर्शन देते हैं। किसान की प्रोफ़ाइल और उपलब्ध होने पर उसकी नवीनतम \
        भविष्यवाणी के आधार पर सलाह दें।",
    profile_heading: "किसान प्रोफ़ाइल:",
    name_label: "नाम",
    region_label: "क्षेत्र",
    crops_label: "फसलें",
    soil_label: "मिट्टी का प्रकार",
    irrigation_label: "सिंचाई विधि",
    unknown: "अज्ञात",
    prediction_heading: "नवीनतम भविष्यवाणी:",
    prediction_type_label: "प्रकार",
    prediction_result_label: "परिणाम",
    prediction_confidence_label: "विश्वास स्तर",
    prediction_crop_label: "फसल",
    prediction_date_label: "तारीख",
    no_prediction: "इस किसान के लिए कोई हालिया भविष्यवाणी उपलब्ध नहीं है।",
    language_instruction: "भाषा: केवल सरल हिंदी में उत्तर दें जिसे किसान आसानी से समझ सके। \
        तकनीकी शब्दों से बचें; यदि ज़रूरी हो तो उन्हें संक्षेप में समझाएँ।",
    question_heading: "किसान का प्रश्न:",
    format_heading: "उत्तर का प्रारूप:",
    format_steps: [
        "1. मुख्य उत्तर: प्रश्न का सीधा उत्तर 2-3 वाक्यों में।",
        "2. कार्य के चरण: 3-5 ठोस कदम जो किसान अभी उठा सकता है।",
        "3. सावधानियाँ: किन बातों से बचना है या किन पर ध्यान देना है।",
        "4. अगला प्रश्न: एक छोटा प्रश्न जो किसान को आगे बढ़ने में मदद करे।",
    ],
};

pub fn text_for(language: Language) -> &'static PromptText {
    match language {
        Language::English => &ENGLISH,
        Language::Hindi => &HINDI,
    }
}
